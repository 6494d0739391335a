//! # Weight Translation
//!
//! Legacy schemes disagree on what their priority numbers mean: some rank
//! groups ascending (rank 1 is the most senior), others store a direct
//! weight (higher wins). Both are translated onto one canonical scale so
//! that prefix/suffix precedence and group ordering survive migration.
//!
//! ## Weight Bands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          WEIGHT BANDS                                   │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  user band       max group weight + 10   prefix/suffix attached        │
//! │                                          directly to a user outranks   │
//! │                                          every group-derived one       │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │  overflow band   max group weight + 5    groups with no rank of        │
//! │                                          their own (ladder-less        │
//! │                                          stragglers)                   │
//! │  ──────────────────────────────────────────────────────────────────     │
//! │  group band      translated group weights                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

/// Headroom left between weight bands.
pub const WEIGHT_MARGIN: i64 = 5;

/// How a legacy scheme orders its groups.
///
/// A property of the source, passed into the translator once — never
/// re-derived as ad hoc arithmetic per adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankConvention {
    /// Lower source rank number = more senior group.
    AscendingPrecedence,
    /// The source value is already a weight; higher wins.
    DirectWeight,
}

/// Translates source ranks onto the canonical weight scale.
#[derive(Debug, Clone, Copy)]
pub struct WeightScale {
    convention: RankConvention,
    max_rank: i64,
    max_weight: i64,
}

impl WeightScale {
    /// Capture the scale from every group rank the source reports.
    ///
    /// With no ranks at all, translation degenerates gracefully: the group
    /// band is empty and the overflow/user bands sit just above zero.
    pub fn from_ranks(
        convention: RankConvention,
        ranks: impl IntoIterator<Item = i64>,
    ) -> Self {
        let ranks: Vec<i64> = ranks.into_iter().collect();
        let max_rank = ranks.iter().copied().max().unwrap_or(0);

        let mut scale = Self {
            convention,
            max_rank,
            max_weight: 0,
        };
        scale.max_weight = ranks
            .iter()
            .map(|rank| scale.translate(*rank))
            .max()
            .unwrap_or(0);
        scale
    }

    /// Translate one source rank into a canonical weight.
    pub fn translate(&self, rank: i64) -> i64 {
        match self.convention {
            RankConvention::AscendingPrecedence => (self.max_rank + WEIGHT_MARGIN) - rank,
            RankConvention::DirectWeight => rank,
        }
    }

    /// Weight band for groups that carry no rank of their own.
    pub fn overflow_weight(&self) -> i64 {
        self.max_weight + WEIGHT_MARGIN
    }

    /// Weight band for prefix/suffix attached directly to a user.
    pub fn user_weight(&self) -> i64 {
        self.overflow_weight() + WEIGHT_MARGIN
    }
}

// ============================================================================
// TESTS
// ============================================================================
