//! Three-way change classification
//!
//! Pure comparison of local and mirror snapshots against the last-synced
//! baseline. Absence counts as a distinct content value, so a deletion
//! on one side racing a modification on the other is a conflict.

use crate::snapshot::Snapshot;
use std::collections::{BTreeMap, BTreeSet};

/// Classification of one relative path across local, mirror, and baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Identical to baseline on both sides, or both sides converged to
    /// the same content
    Unchanged,
    /// Differs from baseline on the local side only (edit or deletion)
    LocalOnly,
    /// Differs from baseline on the mirror side only (edit or deletion)
    MirrorOnly,
    /// New on the local side, absent from baseline and mirror
    AddedLocal,
    /// New on the mirror side, absent from baseline and local
    AddedMirror,
    /// Diverged from baseline on both sides to different content
    Conflict,
    /// Present in baseline, gone from both sides
    Deleted,
}

/// Ephemeral result of one classification pass
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub entries: BTreeMap<String, ChangeKind>,
}

impl ChangeSet {
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.entries.values().filter(|k| **k == kind).count()
    }

    pub fn paths_with(&self, kind: ChangeKind) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(_, k)| **k == kind)
            .map(|(p, _)| p.as_str())
            .collect()
    }

    pub fn conflicts(&self) -> Vec<&str> {
        self.paths_with(ChangeKind::Conflict)
    }

    pub fn has_conflicts(&self) -> bool {
        self.entries.values().any(|k| *k == ChangeKind::Conflict)
    }
}

/// Classify every path in the union of the three snapshots. Deterministic
/// and side-effect free; hashes are the sole authority.
pub fn classify(local: &Snapshot, mirror: &Snapshot, baseline: &Snapshot) -> ChangeSet {
    let paths: BTreeSet<&String> = local
        .keys()
        .chain(mirror.keys())
        .chain(baseline.keys())
        .collect();

    let mut entries = BTreeMap::new();
    for path in paths {
        let l = local.get(path).map(|f| f.hash.as_str());
        let m = mirror.get(path).map(|f| f.hash.as_str());
        let b = baseline.get(path).map(|f| f.hash.as_str());
        entries.insert(path.clone(), classify_one(l, m, b));
    }
    ChangeSet { entries }
}

fn classify_one(local: Option<&str>, mirror: Option<&str>, baseline: Option<&str>) -> ChangeKind {
    let local_changed = local != baseline;
    let mirror_changed = mirror != baseline;

    match (local_changed, mirror_changed) {
        (false, false) => ChangeKind::Unchanged,
        (true, true) if local != mirror => ChangeKind::Conflict,
        (true, true) if local.is_none() => ChangeKind::Deleted,
        // Both sides moved to the same content: converged, not a conflict.
        (true, true) => ChangeKind::Unchanged,
        (true, false) if baseline.is_none() => ChangeKind::AddedLocal,
        (true, false) => ChangeKind::LocalOnly,
        (false, true) if baseline.is_none() => ChangeKind::AddedMirror,
        (false, true) => ChangeKind::MirrorOnly,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileFingerprint;

    fn snap(entries: &[(&str, &str)]) -> Snapshot {
        entries
            .iter()
            .map(|(path, hash)| {
                (
                    path.to_string(),
                    FileFingerprint {
                        hash: hash.to_string(),
                        size: 1,
                        mtime: 0,
                    },
                )
            })
            .collect()
    }

    fn kind_of(local: &Snapshot, mirror: &Snapshot, base: &Snapshot, path: &str) -> ChangeKind {
        classify(local, mirror, base).entries[path]
    }

    #[test]
    fn unchanged_everywhere() {
        let s = snap(&[("a.json", "h0")]);
        assert_eq!(kind_of(&s, &s, &s, "a.json"), ChangeKind::Unchanged);
    }

    #[test]
    fn local_edit_only() {
        let base = snap(&[("a.json", "h0")]);
        let local = snap(&[("a.json", "h1")]);
        assert_eq!(kind_of(&local, &base, &base, "a.json"), ChangeKind::LocalOnly);
    }

    #[test]
    fn mirror_edit_only() {
        let base = snap(&[("a.json", "h0")]);
        let mirror = snap(&[("a.json", "h2")]);
        assert_eq!(kind_of(&base, &mirror, &base, "a.json"), ChangeKind::MirrorOnly);
    }

    #[test]
    fn divergent_edits_conflict() {
        let base = snap(&[("a.json", "h0")]);
        let local = snap(&[("a.json", "h1")]);
        let mirror = snap(&[("a.json", "h2")]);
        assert_eq!(kind_of(&local, &mirror, &base, "a.json"), ChangeKind::Conflict);
    }

    #[test]
    fn identical_edits_converge() {
        let base = snap(&[("a.json", "h0")]);
        let both = snap(&[("a.json", "h1")]);
        assert_eq!(kind_of(&both, &both, &base, "a.json"), ChangeKind::Unchanged);
    }

    #[test]
    fn added_on_one_side() {
        let empty = Snapshot::new();
        let side = snap(&[("new.json", "h1")]);
        assert_eq!(
            kind_of(&side, &empty, &empty, "new.json"),
            ChangeKind::AddedLocal
        );
        assert_eq!(
            kind_of(&empty, &side, &empty, "new.json"),
            ChangeKind::AddedMirror
        );
    }

    #[test]
    fn added_identically_on_both_sides() {
        let empty = Snapshot::new();
        let both = snap(&[("new.json", "h1")]);
        assert_eq!(kind_of(&both, &both, &empty, "new.json"), ChangeKind::Unchanged);
    }

    #[test]
    fn added_divergently_on_both_sides_conflicts() {
        let empty = Snapshot::new();
        let local = snap(&[("new.json", "h1")]);
        let mirror = snap(&[("new.json", "h2")]);
        assert_eq!(
            kind_of(&local, &mirror, &empty, "new.json"),
            ChangeKind::Conflict
        );
    }

    #[test]
    fn deleted_everywhere() {
        let empty = Snapshot::new();
        let base = snap(&[("gone.json", "h0")]);
        assert_eq!(kind_of(&empty, &empty, &base, "gone.json"), ChangeKind::Deleted);
    }

    #[test]
    fn local_deletion_is_local_only() {
        let base = snap(&[("a.json", "h0")]);
        let empty = Snapshot::new();
        assert_eq!(kind_of(&empty, &base, &base, "a.json"), ChangeKind::LocalOnly);
    }

    #[test]
    fn deletion_racing_edit_conflicts() {
        let base = snap(&[("a.json", "h0")]);
        let empty = Snapshot::new();
        let edited = snap(&[("a.json", "h2")]);
        assert_eq!(kind_of(&empty, &edited, &base, "a.json"), ChangeKind::Conflict);
    }

    #[test]
    fn classification_is_idempotent() {
        let base = snap(&[("a.json", "h0"), ("b.json", "h0")]);
        let local = snap(&[("a.json", "h1"), ("b.json", "h0")]);
        let mirror = snap(&[("a.json", "h2"), ("c.json", "h3")]);
        let first = classify(&local, &mirror, &base);
        let second = classify(&local, &mirror, &base);
        assert_eq!(first.entries, second.entries);
    }
}
