use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, VariantNames};

/// Locking granularity, ordered from the finest to the coarsest level.
///
/// A request at some granularity `G` takes an explicit lock at `G` and an intent lock at every
/// coarser level, up to and including [`Granularity::Area`].
///
/// # Examples
/// ```
/// # use minilock_common::Granularity;
/// let levels: Vec<_> = Granularity::Page.up_to_area().collect();
/// assert_eq!(levels, [Granularity::Page, Granularity::Table, Granularity::Area]);
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    VariantNames,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
pub enum Granularity {
    #[default]
    Row,
    Page,
    Table,
    Area,
}

impl Granularity {
    /// Returns the next coarser level, or `None` for [`Granularity::Area`].
    #[inline]
    pub fn coarser(self) -> Option<Self> {
        match self {
            Self::Row => Some(Self::Page),
            Self::Page => Some(Self::Table),
            Self::Table => Some(Self::Area),
            Self::Area => None,
        }
    }

    /// Iterates from `self` outward to [`Granularity::Area`], both ends included.
    #[inline]
    pub fn up_to_area(self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), |g| g.coarser())
    }
}
