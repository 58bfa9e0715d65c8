//! In-memory geometry host.

use std::collections::BTreeMap;

use nalgebra::Point3;
use rustc_hash::FxHashSet;

use super::{GeometryHost, ObjectId};
use crate::curve::Polyline;
use crate::error::{DivideError, Result};
use crate::mesh::FaceMesh;

/// Group that newly created objects land on until they are assigned.
pub const DEFAULT_GROUP: &str = "Default";

/// Geometry stored in a [`MemoryDocument`].
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A polyline curve.
    Curve(Polyline),
    /// A triangle/quad mesh.
    Mesh(FaceMesh),
    /// A bare point (neither curve nor mesh).
    Point(Point3<f64>),
}

#[derive(Debug, Clone)]
struct Entry {
    geometry: Geometry,
    group: String,
    name: Option<String>,
}

/// A document that keeps objects in memory.
///
/// Objects are enumerated in creation order. Newly created objects start on
/// [`DEFAULT_GROUP`]; assigning to a group that does not exist fails, just
/// as it does in CAD hosts.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    objects: BTreeMap<ObjectId, Entry>,
    groups: FxHashSet<String>,
    next_id: u64,
    cancel_requested: bool,
    redraw_enabled: bool,
    refresh_count: usize,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create an empty document containing only [`DEFAULT_GROUP`].
    pub fn new() -> Self {
        let mut groups = FxHashSet::default();
        groups.insert(DEFAULT_GROUP.to_string());
        Self {
            objects: BTreeMap::new(),
            groups,
            next_id: 1,
            cancel_requested: false,
            redraw_enabled: true,
            refresh_count: 0,
        }
    }

    fn insert(&mut self, group: &str, geometry: Geometry) -> ObjectId {
        let id = ObjectId::new(self.next_id);
        self.next_id += 1;
        self.groups.insert(group.to_string());
        self.objects.insert(
            id,
            Entry {
                geometry,
                group: group.to_string(),
                name: None,
            },
        );
        id
    }

    fn entry(&self, object: ObjectId) -> Option<&Entry> {
        self.objects.get(&object)
    }

    fn curve(&self, object: ObjectId) -> Result<&Polyline> {
        match self.entry(object).map(|e| &e.geometry) {
            Some(Geometry::Curve(c)) => Ok(c),
            Some(_) => Err(DivideError::geometry(object, "object is not a curve")),
            None => Err(DivideError::geometry(object, "object does not exist")),
        }
    }

    /// Add a curve on `group`, creating the group if needed.
    pub fn add_curve(&mut self, group: &str, curve: Polyline) -> ObjectId {
        self.insert(group, Geometry::Curve(curve))
    }

    /// Add a polyline through `vertices` on `group`.
    pub fn add_polyline(&mut self, group: &str, vertices: Vec<Point3<f64>>) -> Result<ObjectId> {
        Ok(self.add_curve(group, Polyline::new(vertices)?))
    }

    /// Add a straight line on `group`.
    pub fn add_line(
        &mut self,
        group: &str,
        start: Point3<f64>,
        end: Point3<f64>,
    ) -> Result<ObjectId> {
        Ok(self.add_curve(group, Polyline::line(start, end)?))
    }

    /// Add a mesh on `group` after validating it.
    pub fn add_mesh(&mut self, group: &str, mesh: FaceMesh) -> Result<ObjectId> {
        mesh.validate()?;
        Ok(self.insert(group, Geometry::Mesh(mesh)))
    }

    /// Add a mesh without validation, for exercising coercion failures.
    pub fn add_mesh_unchecked(&mut self, group: &str, mesh: FaceMesh) -> ObjectId {
        self.insert(group, Geometry::Mesh(mesh))
    }

    /// Add a point on `group`.
    pub fn add_point(&mut self, group: &str, point: Point3<f64>) -> ObjectId {
        self.insert(group, Geometry::Point(point))
    }

    /// Name an object.
    pub fn set_name(&mut self, object: ObjectId, name: &str) -> Result<()> {
        let entry = self
            .objects
            .get_mut(&object)
            .ok_or_else(|| DivideError::host("set_name", format!("no object {}", object)))?;
        entry.name = Some(name.to_string());
        Ok(())
    }

    /// Geometry of an object.
    pub fn geometry(&self, object: ObjectId) -> Option<&Geometry> {
        self.entry(object).map(|e| &e.geometry)
    }

    /// Whether the object exists.
    pub fn contains(&self, object: ObjectId) -> bool {
        self.objects.contains_key(&object)
    }

    /// Number of objects in the document.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document has no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Whether a group exists.
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    /// Ask the next cancellation checkpoint to report cancellation.
    pub fn request_cancel(&mut self) {
        self.cancel_requested = true;
    }

    /// How many times the display was refreshed.
    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }

    /// Whether redraw is currently enabled.
    pub fn redraw_enabled(&self) -> bool {
        self.redraw_enabled
    }
}

impl GeometryHost for MemoryDocument {
    fn objects_in_group(&self, group: &str) -> Result<Vec<ObjectId>> {
        Ok(self
            .objects
            .iter()
            .filter(|(_, e)| e.group == group)
            .map(|(&id, _)| id)
            .collect())
    }

    fn is_curve(&self, object: ObjectId) -> bool {
        matches!(self.geometry(object), Some(Geometry::Curve(_)))
    }

    fn is_mesh(&self, object: ObjectId) -> bool {
        matches!(self.geometry(object), Some(Geometry::Mesh(_)))
    }

    fn curve_length(&self, object: ObjectId) -> Result<f64> {
        Ok(self.curve(object)?.length())
    }

    fn curve_point_at(&self, object: ObjectId, t: f64) -> Result<Point3<f64>> {
        if !t.is_finite() {
            return Err(DivideError::geometry(object, format!("invalid parameter {}", t)));
        }
        Ok(self.curve(object)?.point_at(t))
    }

    fn mesh_read(&self, object: ObjectId) -> Result<FaceMesh> {
        let mesh = match self.geometry(object) {
            Some(Geometry::Mesh(m)) => m,
            Some(_) => {
                return Err(DivideError::Coercion {
                    object,
                    message: "object is not a mesh".to_string(),
                })
            }
            None => {
                return Err(DivideError::Coercion {
                    object,
                    message: "object does not exist".to_string(),
                })
            }
        };
        mesh.validate().map_err(|e| DivideError::Coercion {
            object,
            message: e.to_string(),
        })?;
        Ok(mesh.clone())
    }

    fn create_line(&mut self, start: Point3<f64>, end: Point3<f64>) -> Result<ObjectId> {
        let line =
            Polyline::line(start, end).map_err(|e| DivideError::host("create_line", e.to_string()))?;
        Ok(self.add_curve(DEFAULT_GROUP, line))
    }

    fn create_mesh(&mut self, mesh: FaceMesh) -> Result<ObjectId> {
        mesh.validate()
            .map_err(|e| DivideError::host("create_mesh", e.to_string()))?;
        Ok(self.insert(DEFAULT_GROUP, Geometry::Mesh(mesh)))
    }

    fn delete(&mut self, object: ObjectId) -> Result<()> {
        self.objects
            .remove(&object)
            .map(|_| ())
            .ok_or_else(|| DivideError::host("delete", format!("no object {}", object)))
    }

    fn assign_to_group(&mut self, object: ObjectId, group: &str) -> Result<()> {
        if !self.groups.contains(group) {
            return Err(DivideError::host(
                "assign_to_group",
                format!("group '{}' does not exist", group),
            ));
        }
        let entry = self
            .objects
            .get_mut(&object)
            .ok_or_else(|| DivideError::host("assign_to_group", format!("no object {}", object)))?;
        entry.group = group.to_string();
        Ok(())
    }

    fn ensure_group_exists(&mut self, group: &str) -> Result<()> {
        if group.is_empty() {
            return Err(DivideError::host("ensure_group_exists", "group name is empty"));
        }
        self.groups.insert(group.to_string());
        Ok(())
    }

    fn refresh_display(&mut self) {
        self.refresh_count += 1;
    }

    fn check_cancel_requested(&mut self) -> bool {
        self.cancel_requested
    }

    fn set_redraw_enabled(&mut self, enabled: bool) {
        self.redraw_enabled = enabled;
    }

    fn object_group(&self, object: ObjectId) -> Option<String> {
        self.entry(object).map(|e| e.group.clone())
    }

    fn object_name(&self, object: ObjectId) -> Option<String> {
        self.entry(object).and_then(|e| e.name.clone())
    }

    fn mesh_vertex_count(&self, object: ObjectId) -> Result<usize> {
        match self.geometry(object) {
            Some(Geometry::Mesh(m)) => Ok(m.num_vertices()),
            _ => Err(DivideError::Coercion {
                object,
                message: "object is not a mesh".to_string(),
            }),
        }
    }
}
