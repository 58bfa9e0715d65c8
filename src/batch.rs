//! Batch subdivision of every object on a source group.
//!
//! [`BatchProcessor`] walks the objects of a source group in the host's
//! enumeration order, splits curves and meshes onto `"<source>_Subdivided"`,
//! and produces a [`RunReport`].
//!
//! Objects are handled in fixed-size batches. Between batches the host gets
//! a display refresh and a cooperative cancellation checkpoint; batching has
//! no effect on the result.
//!
//! Failure policy:
//!
//! - an empty source group ends the run before any work, with
//!   [`RunStatus::EmptySource`]
//! - a curve failure aborts the whole run ([`RunStatus::Aborted`])
//! - a mesh failure is logged and the object skipped
//! - a mesh the host cannot read counts as a no-op
//!
//! The report is produced in every case and only counts objects whose
//! subdivision fully succeeded.
//!
//! # Example
//!
//! ```
//! use sliver::batch::{BatchProcessor, DivideOptions};
//! use sliver::host::{GeometryHost, MemoryDocument};
//! use nalgebra::Point3;
//!
//! let mut doc = MemoryDocument::new();
//! doc.add_line("Facades", Point3::origin(), Point3::new(120.0, 0.0, 0.0)).unwrap();
//! doc.add_line("Facades", Point3::origin(), Point3::new(0.0, 30.0, 0.0)).unwrap();
//!
//! let report = BatchProcessor::new(&mut doc, DivideOptions::default()).run("Facades");
//! assert!(report.is_complete());
//! assert_eq!(report.curves_processed, 2);
//! assert_eq!(report.created, 6);
//! assert_eq!(doc.objects_in_group("Facades_Subdivided").unwrap().len(), 6);
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use crate::algo::subdivide::{subdivide_curve, subdivide_mesh, MeshOutcome};
use crate::algo::Progress;
use crate::error::{DivideError, Result};
use crate::host::{classify, GeometryHost, ObjectDetails, ObjectId, ObjectKind};

/// Objects handled between two display refreshes.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Suffix appended to the source group name to form the target group.
pub const TARGET_SUFFIX: &str = "_Subdivided";

/// Options for a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct DivideOptions {
    /// Curves shorter than this are left untouched.
    pub min_curve_length: f64,

    /// Faces whose edges are all at most this long are kept as they are.
    pub min_edge_length: f64,

    /// Objects processed between refresh/cancellation checkpoints.
    pub batch_size: usize,

    /// Distance under which midpoints are welded. Zero means exact equality.
    pub weld_tolerance: f64,

    /// Suffix for the target group name.
    pub target_suffix: String,

    /// Whether a cancellation request at a checkpoint stops the run.
    pub stop_on_cancel: bool,
}

impl Default for DivideOptions {
    fn default() -> Self {
        Self {
            min_curve_length: 1.0,
            min_edge_length: 1.0,
            batch_size: DEFAULT_BATCH_SIZE,
            weld_tolerance: 0.0,
            target_suffix: TARGET_SUFFIX.to_string(),
            stop_on_cancel: true,
        }
    }
}

impl DivideOptions {
    /// Create options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum curve length.
    pub fn with_min_curve_length(mut self, length: f64) -> Self {
        self.min_curve_length = length;
        self
    }

    /// Set the minimum edge length.
    pub fn with_min_edge_length(mut self, length: f64) -> Self {
        self.min_edge_length = length;
        self
    }

    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the weld tolerance.
    pub fn with_weld_tolerance(mut self, tolerance: f64) -> Self {
        self.weld_tolerance = tolerance;
        self
    }

    /// Set the target group suffix.
    pub fn with_target_suffix(mut self, suffix: &str) -> Self {
        self.target_suffix = suffix.to_string();
        self
    }

    /// Set whether cancellation requests stop the run.
    pub fn with_stop_on_cancel(mut self, stop: bool) -> Self {
        self.stop_on_cancel = stop;
        self
    }

    /// Name of the group subdivision results go to.
    pub fn target_group(&self, source_group: &str) -> String {
        format!("{}{}", source_group, self.target_suffix)
    }

    /// Reject negative or NaN thresholds and an empty batch size.
    pub fn validate(&self) -> Result<()> {
        let non_negative = |name: &'static str, value: f64| {
            if value >= 0.0 {
                Ok(())
            } else {
                Err(DivideError::invalid_param(name, value, "must be a non-negative number"))
            }
        };
        non_negative("min_curve_length", self.min_curve_length)?;
        non_negative("min_edge_length", self.min_edge_length)?;
        non_negative("weld_tolerance", self.weld_tolerance)?;
        if self.batch_size == 0 {
            return Err(DivideError::invalid_param("batch_size", 0, "must be at least 1"));
        }
        if self.target_suffix.is_empty() {
            return Err(DivideError::invalid_param(
                "target_suffix",
                "\"\"",
                "results would land on the source group",
            ));
        }
        Ok(())
    }
}

/// Object counts taken before any processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Inventory {
    /// All objects on the source group.
    pub total: usize,
    /// Curves among them.
    pub curves: usize,
    /// Meshes among them.
    pub meshes: usize,
}

impl Inventory {
    /// Objects that are neither curves nor meshes.
    pub fn others(&self) -> usize {
        self.total - self.curves - self.meshes
    }
}

impl fmt::Display for Inventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total objects: {}, curves: {}, meshes: {}",
            self.total, self.curves, self.meshes
        )
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Every object was visited.
    Completed,
    /// The source group held no objects.
    EmptySource,
    /// The host asked to cancel at a checkpoint.
    Cancelled {
        /// Batches finished before stopping.
        after_batches: usize,
    },
    /// A fatal error stopped the run.
    Aborted {
        /// The object being processed, if the failure was tied to one.
        object: Option<ObjectId>,
        /// The error.
        error: DivideError,
    },
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Completed => write!(f, "completed"),
            RunStatus::EmptySource => write!(f, "no objects on source group"),
            RunStatus::Cancelled { after_batches } => {
                write!(f, "cancelled after {} batches", after_batches)
            }
            RunStatus::Aborted {
                object: Some(object),
                error,
            } => write!(f, "aborted at object {}: {}", object, error),
            RunStatus::Aborted {
                object: None,
                error,
            } => write!(f, "aborted: {}", error),
        }
    }
}

/// Summary of a batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Group the objects came from.
    pub source_group: String,
    /// Group results were assigned to.
    pub target_group: String,
    /// Counts taken before processing.
    pub inventory: Inventory,
    /// Objects visited, including one that failed.
    pub objects_seen: usize,
    /// Curves handled successfully, including those too short to split.
    pub curves_processed: usize,
    /// Meshes replaced by a refined copy.
    pub meshes_processed: usize,
    /// Objects that were neither curve nor mesh.
    pub others: usize,
    /// Meshes the host could not read.
    pub meshes_skipped: usize,
    /// Meshes whose subdivision failed and were skipped.
    pub meshes_failed: usize,
    /// Objects created: one per curve segment and one per replacement mesh.
    pub created: usize,
    /// Faces in all replacement meshes.
    pub child_faces: usize,
    /// Batches fully processed.
    pub batches_completed: usize,
    /// Wall-clock time of the run.
    pub elapsed: Duration,
    /// How the run ended.
    pub status: RunStatus,
}

impl RunReport {
    fn new(source_group: &str, target_group: String) -> Self {
        Self {
            source_group: source_group.to_string(),
            target_group,
            inventory: Inventory::default(),
            objects_seen: 0,
            curves_processed: 0,
            meshes_processed: 0,
            others: 0,
            meshes_skipped: 0,
            meshes_failed: 0,
            created: 0,
            child_faces: 0,
            batches_completed: 0,
            elapsed: Duration::ZERO,
            status: RunStatus::Completed,
        }
    }

    /// Whether every object was visited.
    pub fn is_complete(&self) -> bool {
        self.status == RunStatus::Completed
    }

    /// Whether a fatal error stopped the run.
    pub fn is_aborted(&self) -> bool {
        matches!(self.status, RunStatus::Aborted { .. })
    }

    /// The error behind an empty or aborted run.
    pub fn error(&self) -> Option<DivideError> {
        match &self.status {
            RunStatus::EmptySource => Some(DivideError::EmptyGroup {
                group: self.source_group.clone(),
            }),
            RunStatus::Aborted { error, .. } => Some(error.clone()),
            RunStatus::Completed | RunStatus::Cancelled { .. } => None,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Final Report:")?;
        writeln!(
            f,
            "Processed {} of {} objects: {} curves, {} meshes, {} other",
            self.objects_seen,
            self.inventory.total,
            self.curves_processed,
            self.meshes_processed,
            self.others
        )?;
        if self.meshes_skipped > 0 || self.meshes_failed > 0 {
            writeln!(
                f,
                "Meshes skipped: {} unreadable, {} failed",
                self.meshes_skipped, self.meshes_failed
            )?;
        }
        writeln!(
            f,
            "Created {} subdivided objects on group '{}'",
            self.created, self.target_group
        )?;
        writeln!(f, "Processing time: {:.2} seconds", self.elapsed.as_secs_f64())?;
        write!(f, "Status: {}", self.status)
    }
}

/// Drives subdivision over every object on a group.
pub struct BatchProcessor<'h, H: GeometryHost + ?Sized> {
    host: &'h mut H,
    options: DivideOptions,
}

impl<'h, H: GeometryHost + ?Sized> BatchProcessor<'h, H> {
    /// Create a processor over `host`.
    pub fn new(host: &'h mut H, options: DivideOptions) -> Self {
        Self { host, options }
    }

    /// The options in use.
    pub fn options(&self) -> &DivideOptions {
        &self.options
    }

    /// Subdivide every object on `source_group`.
    pub fn run(&mut self, source_group: &str) -> RunReport {
        self.run_with_progress(source_group, &Progress::none())
    }

    /// Subdivide every object on `source_group`, reporting once per batch.
    pub fn run_with_progress(&mut self, source_group: &str, progress: &Progress) -> RunReport {
        let start = Instant::now();
        let target_group = self.options.target_group(source_group);
        let mut report = RunReport::new(source_group, target_group);

        let objects = match self.prepare(source_group, &report.target_group) {
            Ok(objects) => objects,
            Err(error) => {
                log::error!("subdivision of '{}' not started: {}", source_group, error);
                report.status = RunStatus::Aborted {
                    object: None,
                    error,
                };
                report.elapsed = start.elapsed();
                return report;
            }
        };

        if objects.is_empty() {
            log::info!("No objects found on group '{}'", source_group);
            report.status = RunStatus::EmptySource;
            report.elapsed = start.elapsed();
            return report;
        }

        let classified: Vec<(ObjectId, ObjectKind)> = objects
            .into_iter()
            .map(|id| (id, classify(&*self.host, id)))
            .collect();
        report.inventory = Inventory {
            total: classified.len(),
            curves: classified.iter().filter(|(_, k)| *k == ObjectKind::Curve).count(),
            meshes: classified.iter().filter(|(_, k)| *k == ObjectKind::Mesh).count(),
        };
        log::info!("Initial count on '{}': {}", source_group, report.inventory);

        let batch_size = self.options.batch_size;
        let total_batches = classified.len().div_ceil(batch_size);
        self.host.set_redraw_enabled(false);

        'batches: for (bi, batch) in classified.chunks(batch_size).enumerate() {
            for &(id, kind) in batch {
                report.objects_seen += 1;
                if let Err(error) = self.process(id, kind, &mut report) {
                    log::error!("Terminating run due to error on curve {}: {}", id, error);
                    report.status = RunStatus::Aborted {
                        object: Some(id),
                        error,
                    };
                    break 'batches;
                }
            }
            report.batches_completed += 1;

            self.host.set_redraw_enabled(true);
            self.host.refresh_display();
            self.host.set_redraw_enabled(false);
            progress.report(bi + 1, total_batches, "Subdividing facades");

            let cancelled = self.host.check_cancel_requested();
            if cancelled && self.options.stop_on_cancel && bi + 1 < total_batches {
                log::info!("Cancellation requested after batch {}", bi + 1);
                report.status = RunStatus::Cancelled {
                    after_batches: report.batches_completed,
                };
                break;
            }
        }

        self.host.set_redraw_enabled(true);
        report.elapsed = start.elapsed();
        log::info!("{}", report);
        report
    }

    fn prepare(&mut self, source_group: &str, target_group: &str) -> Result<Vec<ObjectId>> {
        self.options.validate()?;
        let objects = self.host.objects_in_group(source_group)?;
        if !objects.is_empty() {
            self.host.ensure_group_exists(target_group)?;
        }
        Ok(objects)
    }

    /// Process one object. Only curve failures are returned; they end the run.
    fn process(&mut self, id: ObjectId, kind: ObjectKind, report: &mut RunReport) -> Result<()> {
        match kind {
            ObjectKind::Curve => {
                let created = subdivide_curve(
                    &mut *self.host,
                    id,
                    &report.target_group,
                    self.options.min_curve_length,
                )?;
                report.curves_processed += 1;
                report.created += created;
            }
            ObjectKind::Mesh => {
                match subdivide_mesh(
                    &mut *self.host,
                    id,
                    &report.target_group,
                    self.options.min_edge_length,
                    self.options.weld_tolerance,
                ) {
                    Ok(outcome @ MeshOutcome::Replaced { .. }) => {
                        log::debug!("mesh {} {}", id, outcome);
                        report.meshes_processed += 1;
                        report.created += outcome.created_count();
                        report.child_faces += outcome.face_count();
                    }
                    Ok(MeshOutcome::Skipped { .. }) => {
                        report.meshes_skipped += 1;
                    }
                    Err(e) => {
                        log::warn!("Skipping problematic mesh {}: {}", id, e);
                        report.meshes_failed += 1;
                    }
                }
            }
            ObjectKind::Other => {
                report.others += 1;
                log::debug!(
                    "Skipping {}:\n{}",
                    DivideError::UnsupportedObject { object: id },
                    ObjectDetails::collect(&*self.host, id)
                );
            }
        }
        Ok(())
    }
}

/// Subdivide every object on `source_group` with the given options.
///
/// Shorthand for `BatchProcessor::new(host, options.clone()).run(source_group)`.
pub fn divide_all_facades<H: GeometryHost + ?Sized>(
    host: &mut H,
    source_group: &str,
    options: &DivideOptions,
) -> RunReport {
    BatchProcessor::new(host, options.clone()).run(source_group)
}
