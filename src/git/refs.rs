use crate::models::{RefLabel, RefType};

/// Remote names assumed when none are configured.
pub const DEFAULT_REMOTES: [&str; 2] = ["origin", "upstream"];

/// Split a raw decoration string into typed labels.
///
/// Accepts both short (`HEAD -> main, origin/main, tag: v1`) and full
/// (`refs/heads/main`) decorations. A short name whose first path segment is
/// one of `remote_names` is a remote-tracking branch; anything else is local.
pub fn parse_ref_names(raw: &str, remote_names: &[String]) -> Vec<RefLabel> {
    let mut labels = Vec::new();

    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if let Some(target) = entry.strip_prefix("HEAD -> ") {
            labels.push(RefLabel::new("HEAD", RefType::Head));
            let mut label = classify(target.trim(), remote_names);
            label.is_head = true;
            labels.push(label);
        } else if entry == "grafted" {
            // shallow clone boundary, not a ref
            continue;
        } else {
            labels.push(classify(entry, remote_names));
        }
    }

    labels
}

fn classify(name: &str, remote_names: &[String]) -> RefLabel {
    if name == "HEAD" {
        return RefLabel::new(name, RefType::Head);
    }
    if let Some(tag) = name.strip_prefix("tag: ") {
        let tag = tag.trim();
        return RefLabel::new(tag.strip_prefix("refs/tags/").unwrap_or(tag), RefType::Tag);
    }
    if let Some(branch) = name.strip_prefix("refs/heads/") {
        return RefLabel::new(branch, RefType::LocalBranch);
    }
    if let Some(remote) = name.strip_prefix("refs/remotes/") {
        return RefLabel::new(remote, RefType::RemoteBranch);
    }
    if let Some(tag) = name.strip_prefix("refs/tags/") {
        return RefLabel::new(tag, RefType::Tag);
    }
    if name.starts_with("refs/") {
        return RefLabel::new(name, RefType::Other);
    }

    match name.split_once('/') {
        Some((remote, rest)) if !rest.is_empty() && remote_names.iter().any(|r| r == remote) => {
            RefLabel::new(name, RefType::RemoteBranch)
        }
        _ => RefLabel::new(name, RefType::LocalBranch),
    }
}
