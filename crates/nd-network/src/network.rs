//! Link network representation and builder.
//!
//! # Data layout
//!
//! Link attributes are stored structure-of-arrays and indexed by `LinkId`:
//!
//! ```text
//! link_freespeed_ms[link.index()]   free-flow speed, m/s
//! ```
//!
//! Link ids are dense (`0..link_count`), so "is this link in the network"
//! is a bounds check and per-link tables can be pre-sized.

use nd_core::LinkId;

// ── LinkNetwork ───────────────────────────────────────────────────────────────

/// The set of links that may carry traffic and cause noise.
///
/// All fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`LinkNetworkBuilder`].
#[derive(Clone, Debug, PartialEq)]
pub struct LinkNetwork {
    /// Free-flow speed of each link in metres per second.
    pub link_freespeed_ms: Vec<f64>,
}

impl LinkNetwork {
    /// Construct a network with no links.
    pub fn empty() -> Self {
        LinkNetworkBuilder::new().build()
    }

    pub fn link_count(&self) -> usize {
        self.link_freespeed_ms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.link_freespeed_ms.is_empty()
    }

    /// `true` if `link` was added to this network.
    #[inline]
    pub fn contains(&self, link: LinkId) -> bool {
        link.index() < self.link_count()
    }

    /// Iterator over every `LinkId` in ascending order.
    pub fn links(&self) -> impl Iterator<Item = LinkId> {
        (0..self.link_count() as u32).map(LinkId)
    }

    /// Free-flow speed in km/h, the unit the emission curves expect.
    ///
    /// Returns `None` for links outside the network.
    #[inline]
    pub fn freespeed_kmh(&self, link: LinkId) -> Option<f64> {
        self.link_freespeed_ms.get(link.index()).map(|v| v * 3.6)
    }
}

// ── LinkNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`LinkNetwork`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use nd_network::LinkNetworkBuilder;
///
/// let mut b = LinkNetworkBuilder::new();
/// let main_street = b.add_link(13.89); // 50 km/h
/// let bypass      = b.add_link(27.78); // 100 km/h
/// let net = b.build();
/// assert_eq!(net.link_count(), 2);
/// assert!((net.freespeed_kmh(bypass).unwrap() - 100.0).abs() < 0.01);
/// assert!(net.contains(main_street));
/// ```
#[derive(Debug)]
pub struct LinkNetworkBuilder {
    freespeed_ms: Vec<f64>,
}

impl LinkNetworkBuilder {
    pub fn new() -> Self {
        Self { freespeed_ms: Vec::new() }
    }

    /// Pre-allocate for the expected number of links.
    pub fn with_capacity(links: usize) -> Self {
        Self { freespeed_ms: Vec::with_capacity(links) }
    }

    /// Add a link and return its `LinkId` (sequential from 0).
    pub fn add_link(&mut self, freespeed_ms: f64) -> LinkId {
        let id = LinkId(self.freespeed_ms.len() as u32);
        self.freespeed_ms.push(freespeed_ms);
        id
    }

    pub fn link_count(&self) -> usize { self.freespeed_ms.len() }

    /// Consume the builder and produce a [`LinkNetwork`].
    pub fn build(self) -> LinkNetwork {
        LinkNetwork { link_freespeed_ms: self.freespeed_ms }
    }
}

impl Default for LinkNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
