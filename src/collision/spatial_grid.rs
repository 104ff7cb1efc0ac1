// Implements the fixed zone grid that partitions the collision world.

use crate::collision::aabb::Aabb;
use crate::collision::zone::{Zone, ZoneId};
use crate::collision::ColliderRef;
use crate::error::{CollisionError, Result};
use crate::math::vec2::Vec2;

/// A uniform grid of zones covering `[0, width] x [0, height]`.
///
/// Zones are stored row-major (`index = row * cols + col`). Every column but
/// the last is `zone_width` wide; the last one absorbs any remainder of
/// `width / cols`, and likewise for rows.
#[derive(Debug)]
pub struct ZoneGrid {
    bounds: Aabb,
    zone_width: i32,
    zone_height: i32,
    num_cols: usize,
    num_rows: usize,
    zones: Vec<Zone>,
}

impl ZoneGrid {
    /// Creates the grid and wires up the adjacency of every zone.
    ///
    /// # Arguments
    /// * `width`, `height` - extent of the world, both positive.
    /// * `x_zones`, `y_zones` - number of columns and rows, both positive and
    ///   small enough that every zone is at least one unit wide.
    pub fn new(width: i32, height: i32, x_zones: i32, y_zones: i32) -> Result<Self> {
        if x_zones <= 0 || y_zones <= 0 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "zone counts must be positive, got {x_zones}x{y_zones}"
            )));
        }
        if width <= 0 || height <= 0 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "world extent must be positive, got {width}x{height}"
            )));
        }
        let zone_width = width / x_zones;
        let zone_height = height / y_zones;
        if zone_width < 1 || zone_height < 1 {
            return Err(CollisionError::InvalidGridConfiguration(format!(
                "{width}x{height} world cannot be split into {x_zones}x{y_zones} zones"
            )));
        }

        // Both counts are positive i32 here.
        let num_cols = x_zones as usize;
        let num_rows = y_zones as usize;

        let mut zones = Vec::with_capacity(num_cols * num_rows);
        for row in 0..num_rows {
            for col in 0..num_cols {
                let min_x = col as i32 * zone_width;
                let min_y = row as i32 * zone_height;
                let max_x = if col + 1 == num_cols { width } else { min_x + zone_width };
                let max_y = if row + 1 == num_rows { height } else { min_y + zone_height };
                let index = col + row * num_cols;
                zones.push(Zone::new(
                    ZoneId::new(index),
                    col,
                    row,
                    Aabb::from_bounds(min_x, max_x, min_y, max_y),
                    adjacent_indices(index, num_cols, num_rows)
                        .into_iter()
                        .map(ZoneId::new)
                        .collect(),
                ));
            }
        }

        log::debug!(
            "Creating ZoneGrid: world={}x{}, zone={}x{}, dims={}x{}, total_zones={}",
            width,
            height,
            zone_width,
            zone_height,
            num_cols,
            num_rows,
            zones.len()
        );

        Ok(ZoneGrid {
            bounds: Aabb::from_bounds(0, width, 0, height),
            zone_width,
            zone_height,
            num_cols,
            num_rows,
            zones,
        })
    }

    // --- Helper Methods ---

    /// Converts a world coordinate to a column/row index along one axis.
    ///
    /// Zone edges are inclusive and shared, so a coordinate sitting exactly on
    /// the boundary between two cells belongs to the lower one (the first in
    /// scan order). Coordinates outside the world clamp to the edge cells.
    #[inline]
    fn axis_index(coord: i32, extent: i32, cells: usize) -> usize {
        if coord <= 0 {
            return 0;
        }
        let index = ((coord - 1) / extent) as usize;
        index.min(cells - 1)
    }

    /// Converts world coordinates to grid cell indices (col, row).
    #[inline]
    fn cell_indices(&self, point: Vec2) -> (usize, usize) {
        (
            Self::axis_index(point.x, self.zone_width, self.num_cols),
            Self::axis_index(point.y, self.zone_height, self.num_rows),
        )
    }

    /// Converts grid cell indices (col, row) to a 1D vector index.
    /// Returns None if the indices are outside the grid bounds.
    #[inline]
    fn cell_index_1d(&self, col: isize, row: isize) -> Option<usize> {
        if col >= 0 && (col as usize) < self.num_cols && row >= 0 && (row as usize) < self.num_rows {
            Some(col as usize + row as usize * self.num_cols)
        } else {
            None
        }
    }

    // --- Public API Methods ---

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id.index())
    }

    /// Width or height of the narrowest zone side.
    pub fn min_zone_extent(&self) -> i32 {
        self.zone_width.min(self.zone_height)
    }

    /// The zone a point is assigned to. Points outside the world map to the
    /// nearest edge zone, so every point has a zone.
    pub fn zone_for(&self, point: Vec2) -> ZoneId {
        let (col, row) = self.cell_indices(point);
        ZoneId::new(col + row * self.num_cols)
    }

    /// First zone in scan order whose bounds contain the point, by testing
    /// every zone. `zone_for` gives the same answer for points inside the
    /// world in constant time.
    pub fn find_zone_by_scan(&self, point: Vec2) -> Option<ZoneId> {
        self.zones
            .iter()
            .find(|zone| zone.within_bounds(point.x, point.y))
            .map(Zone::id)
    }

    /// Clears every zone's member set.
    pub fn clear(&mut self) {
        for zone in self.zones.iter_mut() {
            zone.clear_members();
        }
    }

    /// Places a collider in the zone containing its position and updates its
    /// zone back-reference.
    pub fn insert(&mut self, collider: &ColliderRef) -> ZoneId {
        let id = self.zone_for(collider.position());
        self.zones[id.index()].add_member(collider.clone());
        collider.set_zone(Some(id));
        id
    }

    /// Removes a collider from the zone its back-reference points at.
    pub fn remove(&mut self, collider: &ColliderRef) -> bool {
        let removed = collider
            .zone()
            .and_then(|zone| self.zones.get_mut(zone.index()))
            .and_then(|zone| zone.remove_member(collider.id()))
            .is_some();
        collider.set_zone(None);
        removed
    }

    /// Number of rings of zones around a zone that must be searched so that
    /// any two objects whose bounding circles can touch (centre distance at
    /// most `max_contact`) are found. Objects `k + 1` cells apart along an
    /// axis are more than `k * min_zone_extent` apart.
    pub fn reach_for(&self, max_contact: i64) -> usize {
        let extent = i64::from(self.min_zone_extent());
        let reach = (max_contact.max(0) / extent + 1) as usize;
        reach.min(self.num_cols.max(self.num_rows))
    }

    /// True if the square ring of `reach` cells around `zone` covers the grid.
    pub fn ring_covers_grid(&self, zone: ZoneId, reach: usize) -> bool {
        let (col, row) = self.zones[zone.index()].cell();
        col <= reach
            && col + reach >= self.num_cols - 1
            && row <= reach
            && row + reach >= self.num_rows - 1
    }

    /// Candidate colliders for a zone: its own members plus the members of
    /// every zone within `reach` rings. With `fringe_only`, neighbours only
    /// contribute their fringe members.
    ///
    /// Each collider is a member of at most one zone, so the result holds no
    /// duplicates without further filtering.
    pub fn candidates(&self, zone_id: ZoneId, reach: usize, fringe_only: bool) -> Vec<ColliderRef> {
        let zone = &self.zones[zone_id.index()];
        if reach <= 1 && !fringe_only {
            return zone.compute_candidates(&self.zones);
        }

        let (col, row) = zone.cell();
        let reach = reach as isize;
        let mut candidates: Vec<ColliderRef> = zone.members().cloned().collect();
        for d_row in -reach..=reach {
            for d_col in -reach..=reach {
                if d_row == 0 && d_col == 0 {
                    continue;
                }
                let Some(index) = self.cell_index_1d(col as isize + d_col, row as isize + d_row) else {
                    continue;
                };
                let neighbour = &self.zones[index];
                candidates.extend(
                    neighbour
                        .members()
                        .filter(|collider| !fringe_only || neighbour.is_fringe(collider))
                        .cloned(),
                );
            }
        }
        candidates
    }
}

/// Row-major indices of the 8-neighbourhood of `index` in a `cols x rows`
/// grid. Edge cells do not wrap and never reference cells outside the grid.
pub fn adjacent_indices(index: usize, cols: usize, rows: usize) -> Vec<usize> {
    let col = (index % cols) as isize;
    let row = (index / cols) as isize;
    let mut adjacent = Vec::with_capacity(8);
    for d_row in -1..=1 {
        for d_col in -1..=1 {
            if d_row == 0 && d_col == 0 {
                continue;
            }
            let (c, r) = (col + d_col, row + d_row);
            if c >= 0 && (c as usize) < cols && r >= 0 && (r as usize) < rows {
                adjacent.push(c as usize + r as usize * cols);
            }
        }
    }
    adjacent
}
