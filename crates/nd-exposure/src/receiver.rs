//! Receiver points and their immission levels.

use std::collections::{BTreeMap, BTreeSet};

use nd_core::{LinkId, ReceiverId, TimeInterval};

// ── ReceiverPoint ─────────────────────────────────────────────────────────────

/// One location at which noise exposure is evaluated.
///
/// Levels are produced by the external propagation model and are read-only
/// here.  Per-link contributions use a flat `(interval, link)` key so all
/// contributions of one interval form a contiguous range.
#[derive(Clone, Debug, PartialEq)]
pub struct ReceiverPoint {
    pub id: ReceiverId,

    /// Combined level (dB(A)) per interval.
    pub immission: BTreeMap<TimeInterval, f64>,

    /// Isolated level (dB(A)) each link would produce here on its own.
    pub isolated: BTreeMap<(TimeInterval, LinkId), f64>,
}

impl ReceiverPoint {
    pub fn new(id: ReceiverId) -> Self {
        Self { id, immission: BTreeMap::new(), isolated: BTreeMap::new() }
    }

    pub fn set_immission(&mut self, interval: TimeInterval, level_db: f64) {
        self.immission.insert(interval, level_db);
    }

    pub fn set_isolated(&mut self, interval: TimeInterval, link: LinkId, level_db: f64) {
        self.isolated.insert((interval, link), level_db);
    }

    /// Combined level for `interval`, if the propagation model recorded one.
    #[inline]
    pub fn immission(&self, interval: TimeInterval) -> Option<f64> {
        self.immission.get(&interval).copied()
    }

    /// `(link, isolated level)` pairs for one interval, ascending by link.
    pub fn isolated_at(&self, interval: TimeInterval) -> impl Iterator<Item = (LinkId, f64)> + '_ {
        self.isolated
            .range((interval, LinkId(0))..=(interval, LinkId(u32::MAX)))
            .map(|(&(_, link), &level)| (link, level))
    }

    /// Every link that contributes to this receiver in any interval.
    pub fn relevant_links(&self) -> BTreeSet<LinkId> {
        self.isolated.keys().map(|&(_, link)| link).collect()
    }
}

// ── ReceiverSet ───────────────────────────────────────────────────────────────

/// All receiver points of a scenario, kept sorted by `ReceiverId`.
///
/// Sorted storage gives receiver-major iteration order for free and a
/// contiguous slice for parallel stages.
#[derive(Clone, Debug, Default)]
pub struct ReceiverSet {
    points: Vec<ReceiverPoint>,
}

impl ReceiverSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Insert or replace a receiver point.
    pub fn insert(&mut self, point: ReceiverPoint) {
        match self.points.binary_search_by_key(&point.id, |p| p.id) {
            Ok(i)  => self.points[i] = point,
            Err(i) => self.points.insert(i, point),
        }
    }

    /// Mutable access to `id`, creating an empty point if absent.
    pub fn entry(&mut self, id: ReceiverId) -> &mut ReceiverPoint {
        let i = match self.points.binary_search_by_key(&id, |p| p.id) {
            Ok(i) => i,
            Err(i) => {
                self.points.insert(i, ReceiverPoint::new(id));
                i
            }
        };
        &mut self.points[i]
    }

    pub fn get(&self, id: ReceiverId) -> Option<&ReceiverPoint> {
        self.points
            .binary_search_by_key(&id, |p| p.id)
            .ok()
            .map(|i| &self.points[i])
    }

    /// Receivers in ascending id order.
    pub fn iter(&self) -> std::slice::Iter<'_, ReceiverPoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[ReceiverPoint] {
        &self.points
    }
}

impl FromIterator<ReceiverPoint> for ReceiverSet {
    fn from_iter<I: IntoIterator<Item = ReceiverPoint>>(iter: I) -> Self {
        let mut set = ReceiverSet::new();
        for point in iter {
            set.insert(point);
        }
        set
    }
}

impl<'a> IntoIterator for &'a ReceiverSet {
    type Item = &'a ReceiverPoint;
    type IntoIter = std::slice::Iter<'a, ReceiverPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
