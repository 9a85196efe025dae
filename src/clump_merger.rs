//! Reconciles clump ids that turn out to touch
//!
//! A labeling pass can give one connected region several ids before it knows
//! the pieces are adjacent. Every adjacent pair is fed to [`ClumpMerger::update`]
//! and [`ClumpMerger::merge`] then produces the final partition of ids.
//!
//! Backed by a disjoint-set forest with path halving and union by rank.

/// Partition of the ids `0..n` built from pairwise relations
#[derive(Debug, Clone)]
pub struct ClumpMerger {
    parent: Vec<usize>,
    rank: Vec<u8>,
    merged: Vec<Vec<usize>>,
}

impl ClumpMerger {
    /// `n` items, each initially alone in its own group
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
            merged: Vec::new(),
        }
    }

    /// Number of items being partitioned
    pub fn num_items(&self) -> usize {
        self.parent.len()
    }

    /// Record that `i` and `j` belong together. Out of range ids are logged
    /// and ignored.
    pub fn update(&mut self, i: usize, j: usize) {
        let n = self.parent.len();
        if i >= n || j >= n {
            log::error!("merge relation ({}, {}) outside [0,{})", i, j, n);
            return;
        }
        let ri = self.find(i);
        let rj = self.find(j);
        if ri == rj {
            return;
        }
        match self.rank[ri].cmp(&self.rank[rj]) {
            std::cmp::Ordering::Less => self.parent[ri] = rj,
            std::cmp::Ordering::Greater => self.parent[rj] = ri,
            std::cmp::Ordering::Equal => {
                self.parent[rj] = ri;
                self.rank[ri] += 1;
            }
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Rebuild the groups from every relation recorded so far.
    ///
    /// Groups come out ordered by their smallest member, members ascending.
    /// Calling again after more updates can only join groups.
    pub fn merge(&mut self) {
        let n = self.parent.len();
        let mut slot_of_root: Vec<Option<usize>> = vec![None; n];
        self.merged.clear();
        for i in 0..n {
            let root = self.find(i);
            match slot_of_root[root] {
                Some(slot) => self.merged[slot].push(i),
                None => {
                    slot_of_root[root] = Some(self.merged.len());
                    self.merged.push(vec![i]);
                }
            }
        }
    }

    /// Number of groups found by the last [`ClumpMerger::merge`]
    pub fn num_merged(&self) -> usize {
        self.merged.len()
    }

    /// The `i`th group; out of range is logged and answered with no members
    pub fn ith_merged(&self, i: usize) -> &[usize] {
        match self.merged.get(i) {
            Some(group) => group.as_slice(),
            None => {
                log::error!("merged group {} out of range [0,{})", i, self.merged.len());
                &[]
            }
        }
    }

    /// All groups found by the last merge
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.merged
    }
}
