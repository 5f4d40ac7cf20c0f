use crate::app_error::AppResult;
use crate::diff::{apply_diff, calc_diff};
use crate::version_store::read_version_diff;
use crate::wire::{FileDiff, VersionDiff};
use std::collections::BTreeMap;
use std::path::Path;

/// Full project content at some version: file name to lines.
pub type State = BTreeMap<String, Vec<String>>;

pub fn apply_version_diff_to_state(state: &mut State, vd: &VersionDiff) -> AppResult<()> {
    for fd in &vd.edited_files {
        if fd.is_deleted {
            state.remove(&fd.file_name);
            continue;
        }
        let base = state.get(&fd.file_name).cloned().unwrap_or_default();
        let next = apply_diff(&base, &fd.content_diff)?;
        state.insert(fd.file_name.clone(), next);
    }
    Ok(())
}

/// Replays stored diffs `1..=upto` over the empty tree.
pub fn replay_state(root: &Path, upto: u64) -> AppResult<State> {
    let mut state = State::new();
    for version in 1..=upto {
        let vd = read_version_diff(root, version)?;
        apply_version_diff_to_state(&mut state, &vd)?;
    }
    Ok(state)
}

/// One file diff per file that differs between the two states.
pub fn calc_files_diff_between_states(pre: &State, post: &State) -> Vec<FileDiff> {
    let mut names: Vec<&String> = pre.keys().chain(post.keys()).collect();
    names.sort();
    names.dedup();

    let mut out = Vec::new();
    for name in names {
        match (pre.get(name), post.get(name)) {
            (Some(_), None) => out.push(FileDiff::deleted(name)),
            (None, Some(lines)) => out.push(FileDiff::edited(name, calc_diff(&[], lines))),
            (Some(before), Some(after)) => {
                if before != after {
                    out.push(FileDiff::edited(name, calc_diff(before, after)));
                }
            }
            (None, None) => {}
        }
    }
    out
}

/// The combined delta taking the stored project from version `from` to
/// version `to`. The caller is responsible for bounds against the current
/// version counter.
pub fn compose_version_diff(root: &Path, from: u64, to: u64) -> AppResult<VersionDiff> {
    let pre = replay_state(root, from)?;
    let mut post = pre.clone();
    for version in from + 1..=to {
        let vd = read_version_diff(root, version)?;
        apply_version_diff_to_state(&mut post, &vd)?;
    }
    Ok(VersionDiff {
        prev_version: from,
        cur_version: to,
        edited_files: calc_files_diff_between_states(&pre, &post),
    })
}
