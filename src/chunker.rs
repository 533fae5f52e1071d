use crate::waypoint_types::{Waypoint, WaypointTable};

/// A contiguous run of waypoints written to one output document.
#[derive(Debug, Clone, Copy)]
pub struct Chunk<'a> {
    /// 0-based position among the table's chunks.
    pub index: usize,
    pub waypoints: &'a [Waypoint],
}

impl Chunk<'_> {
    /// `<base><ext>` for the first chunk, `<base>_<index+1><ext>` after that.
    pub fn file_name(&self, base_name: &str, extension: &str) -> String {
        if self.index == 0 {
            format!("{base_name}{extension}")
        } else {
            format!("{base_name}_{}{extension}", self.index + 1)
        }
    }
}

/// Split a table into windows of at most `limit` waypoints, in order.
/// A limit of 0 means no limit. An empty table has no chunks.
pub fn chunk(table: &WaypointTable, limit: usize) -> Vec<Chunk<'_>> {
    let size = if limit == 0 { table.len() } else { limit };
    if size == 0 {
        return Vec::new();
    }
    table
        .waypoints
        .chunks(size)
        .enumerate()
        .map(|(index, waypoints)| Chunk { index, waypoints })
        .collect()
}
