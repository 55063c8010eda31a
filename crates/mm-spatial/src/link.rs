//! Link storage and builder.
//!
//! # Data layout
//!
//! Links live in **Structure-of-Arrays** form indexed by the dense
//! [`LinkIdx`]: parallel `Vec`s for endpoints, geometry, bearing, length,
//! and direction.  The external [`LinkId`] appears twice — as a per-link
//! array for result emission and as an `FxHashMap` for reverse lookup.
//!
//! Bearings are derived from the **geographic** first and last vertices of
//! each link at build time; geometries are stored projected (metres) because
//! every downstream consumer (spatial index, trimming, coverage) is metric.

use rustc_hash::FxHashMap;

use mm_core::{GeoPoint, LinkId, LinkIdx, NodeId, Polyline, polyline_bearing};

use crate::{SpatialError, SpatialResult};

/// Which traversal directions a link admits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum LinkDirection {
    /// Traversable a→b and b→a (the common case).
    #[default]
    Both,
    /// One-way a→b.
    Forward,
    /// One-way b→a.
    Reverse,
}

impl LinkDirection {
    /// Decode the conventional −1/0/+1 column value.
    pub fn from_flag(flag: i8) -> Self {
        match flag {
            f if f > 0 => LinkDirection::Forward,
            f if f < 0 => LinkDirection::Reverse,
            _ => LinkDirection::Both,
        }
    }
}

/// SoA storage for all links of a network.
///
/// Construct via [`LinkStoreBuilder`]; read-only afterwards except for
/// [`set_speed_field`](Self::set_speed_field).
#[derive(Debug)]
pub struct LinkStore {
    ids: Vec<LinkId>,
    index_of: FxHashMap<LinkId, LinkIdx>,
    a_node: Vec<NodeId>,
    b_node: Vec<NodeId>,
    geometry: Vec<Polyline>,
    bearing: Vec<f64>,
    length_m: Vec<f64>,
    direction: Vec<LinkDirection>,
    /// Extra numeric columns from the input, keyed by column name.
    /// `NaN` marks links where the column had no value.
    attributes: FxHashMap<String, Vec<f64>>,
    speed_field: Option<String>,
    node_count: usize,
}

impl LinkStore {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of dense graph nodes referenced by links.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    // ── Per-link accessors ────────────────────────────────────────────────

    #[inline]
    pub fn id(&self, link: LinkIdx) -> LinkId {
        self.ids[link.index()]
    }

    /// Dense index for an external link id, if the link exists.
    pub fn idx(&self, id: LinkId) -> Option<LinkIdx> {
        self.index_of.get(&id).copied()
    }

    #[inline]
    pub fn endpoints(&self, link: LinkIdx) -> (NodeId, NodeId) {
        (self.a_node[link.index()], self.b_node[link.index()])
    }

    #[inline]
    pub fn geometry(&self, link: LinkIdx) -> &Polyline {
        &self.geometry[link.index()]
    }

    #[inline]
    pub fn bearing(&self, link: LinkIdx) -> f64 {
        self.bearing[link.index()]
    }

    #[inline]
    pub fn length_m(&self, link: LinkIdx) -> f64 {
        self.length_m[link.index()]
    }

    #[inline]
    pub fn direction(&self, link: LinkIdx) -> LinkDirection {
        self.direction[link.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = LinkIdx> + '_ {
        (0..self.len()).map(|i| LinkIdx(i as u32))
    }

    // ── Speed filter ──────────────────────────────────────────────────────

    /// Select the named attribute column as the per-link speed cap.
    ///
    /// Fails with [`SpatialError::UnknownSpeedField`] if the links were
    /// loaded without that column.
    pub fn set_speed_field(&mut self, name: &str) -> SpatialResult<()> {
        if !self.attributes.contains_key(name) {
            return Err(SpatialError::UnknownSpeedField(name.to_string()));
        }
        self.speed_field = Some(name.to_string());
        Ok(())
    }

    pub fn has_speed(&self) -> bool {
        self.speed_field.is_some()
    }

    /// Speed cap for a link, if a speed field is selected and the link has a
    /// value in it.
    pub fn speed_cap(&self, link: LinkIdx) -> Option<f64> {
        let field = self.speed_field.as_deref()?;
        let v = self.attributes.get(field)?[link.index()];
        (!v.is_nan()).then_some(v)
    }

    /// Numeric attribute value by column name (loader extras).
    pub fn attribute(&self, name: &str, link: LinkIdx) -> Option<f64> {
        let v = *self.attributes.get(name)?.get(link.index())?;
        (!v.is_nan()).then_some(v)
    }
}

// ── LinkStoreBuilder ──────────────────────────────────────────────────────────

/// Construct a [`LinkStore`] incrementally, then call [`build`](Self::build).
///
/// External node numbers (from the links table) are mapped to dense
/// [`NodeId`]s in first-seen order; the mapping is internal and never
/// emitted, matching the graph-internal node contract.
pub struct LinkStoreBuilder {
    store: LinkStore,
    node_map: FxHashMap<u64, NodeId>,
}

impl LinkStoreBuilder {
    pub fn new() -> Self {
        Self {
            store: LinkStore {
                ids: Vec::new(),
                index_of: FxHashMap::default(),
                a_node: Vec::new(),
                b_node: Vec::new(),
                geometry: Vec::new(),
                bearing: Vec::new(),
                length_m: Vec::new(),
                direction: Vec::new(),
                attributes: FxHashMap::default(),
                speed_field: None,
                node_count: 0,
            },
            node_map: FxHashMap::default(),
        }
    }

    fn map_node(&mut self, external: u64) -> NodeId {
        let next = NodeId(self.node_map.len() as u32);
        let id = *self.node_map.entry(external).or_insert(next);
        self.store.node_count = self.node_map.len();
        id
    }

    /// Add one link with its geographic polyline.
    ///
    /// Derives the bearing from the first/last geographic vertices, projects
    /// the geometry into the working CRS, and measures its metric length.
    pub fn add_link(
        &mut self,
        id: LinkId,
        a_node: u64,
        b_node: u64,
        geometry: &[GeoPoint],
        direction: LinkDirection,
    ) -> SpatialResult<LinkIdx> {
        if self.store.index_of.contains_key(&id) {
            return Err(SpatialError::DuplicateLink(id));
        }
        if geometry.len() < 2 {
            return Err(SpatialError::DegenerateGeometry(id, geometry.len()));
        }

        let idx = LinkIdx(self.store.ids.len() as u32);
        let a = self.map_node(a_node);
        let b = self.map_node(b_node);

        let projected = Polyline::new(geometry.iter().map(|g| g.to_mercator()).collect());

        self.store.index_of.insert(id, idx);
        self.store.ids.push(id);
        self.store.a_node.push(a);
        self.store.b_node.push(b);
        self.store.bearing.push(polyline_bearing(geometry));
        self.store.length_m.push(projected.length());
        self.store.geometry.push(projected);
        self.store.direction.push(direction);

        Ok(idx)
    }

    /// Record a numeric attribute for a link added earlier.  Columns are
    /// created on first use and backfilled with `NaN`.
    pub fn set_attribute(&mut self, link: LinkIdx, name: &str, value: f64) {
        let n = self.store.ids.len();
        let col = self
            .store
            .attributes
            .entry(name.to_string())
            .or_insert_with(|| vec![f64::NAN; n]);
        col.resize(n, f64::NAN);
        col[link.index()] = value;
    }

    pub fn link_count(&self) -> usize {
        self.store.ids.len()
    }

    /// Consume the builder and produce the [`LinkStore`].
    pub fn build(mut self) -> LinkStore {
        let n = self.store.ids.len();
        for col in self.store.attributes.values_mut() {
            col.resize(n, f64::NAN);
        }
        self.store
    }
}

impl Default for LinkStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}
