//! The observer: owns the pose, the config, the detection task and the
//! visible-target set, and drives both passes from the host's tick.
//!
//! Per tick the host must set the final pose first and then call
//! [`Observer::tick`], which runs detection if its delay has elapsed and
//! then rebuilds the view mesh from the pose just set.

use std::time::Duration;

use crate::backend::{PresentationSink, RaycastBackend, RenderSink, TargetProvider};
use crate::config::FovConfig;
use crate::detection::{find_visible_targets, VisibleTargets};
use crate::error::FovError;
use crate::mesh::ViewMesh;
use crate::schedule::RecurringTask;
use crate::types::{Pose, TargetId};
use crate::view::{build_view_polygon, ViewPolygon};

/// What one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// Whether a detection pass ran on this tick.
    pub detected: bool,
    /// The mesh handed to the render sink.
    pub mesh: ViewMesh,
}

#[derive(Debug, Clone)]
pub struct Observer {
    pose: Pose,
    config: FovConfig,
    delay: Duration,
    known_targets: Vec<TargetId>,
    visible: VisibleTargets,
    detection: Option<RecurringTask>,
}

impl Observer {
    /// Create an inactive observer. Fails if `config` does not validate.
    pub fn new(pose: Pose, config: FovConfig) -> Result<Self, FovError> {
        config.validate()?;
        let delay = config.detection_delay()?;
        Ok(Self {
            pose,
            config,
            delay,
            known_targets: Vec::new(),
            visible: VisibleTargets::default(),
            detection: None,
        })
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
    }

    pub fn config(&self) -> &FovConfig {
        &self.config
    }

    pub fn visible_targets(&self) -> &VisibleTargets {
        &self.visible
    }

    /// Targets resolved at activation; these receive presentation updates.
    pub fn known_targets(&self) -> &[TargetId] {
        &self.known_targets
    }

    pub fn is_active(&self) -> bool {
        self.detection
            .as_ref()
            .is_some_and(|task| !task.is_cancelled())
    }

    /// Resolve the known targets once and start the detection task.
    /// Re-activating restarts the task and re-resolves targets.
    pub fn activate<P: TargetProvider + ?Sized>(&mut self, provider: &P) {
        self.known_targets = provider
            .all_targets(self.config.target_mask)
            .into_iter()
            .map(|t| t.id)
            .collect();
        self.detection = Some(RecurringTask::new(self.delay));
        log::debug!(
            "observer activated: {} known targets, detection every {:?}",
            self.known_targets.len(),
            self.delay
        );
    }

    /// Cancel the detection task and forget the visible set.
    pub fn deactivate(&mut self) {
        if let Some(task) = self.detection.as_mut() {
            task.cancel();
            log::debug!(
                "observer deactivated after {} detection passes",
                task.runs()
            );
        }
        self.detection = None;
        self.visible.clear();
    }

    /// Run a detection pass now and push membership for every known
    /// target to `presenter`.
    pub fn detect<W, S>(&mut self, world: &W, presenter: &mut S) -> &VisibleTargets
    where
        W: TargetProvider + RaycastBackend + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let found = find_visible_targets(&self.pose, &self.config, world, world);
        self.visible.replace(found);
        for &id in &self.known_targets {
            presenter.set_target_visible(id, self.visible.contains(id));
        }
        &self.visible
    }

    pub fn view_polygon<R>(&self, backend: &R) -> ViewPolygon
    where
        R: RaycastBackend + ?Sized,
    {
        build_view_polygon(&self.pose, &self.config, backend)
    }

    pub fn view_mesh<R: RaycastBackend + ?Sized>(&self, backend: &R) -> ViewMesh {
        let polygon = self.view_polygon(backend);
        ViewMesh::from_polygon(&self.pose, &polygon, self.config.mask_cutaway_dst)
    }

    /// Advance one rendering tick of length `dt`.
    pub fn tick<W, R, S>(
        &mut self,
        dt: Duration,
        world: &W,
        renderer: &mut R,
        presenter: &mut S,
    ) -> Result<TickOutcome, FovError>
    where
        W: TargetProvider + RaycastBackend + ?Sized,
        R: RenderSink + ?Sized,
        S: PresentationSink + ?Sized,
    {
        let due = match self.detection.as_mut() {
            Some(task) => task.advance(dt),
            None => return Err(FovError::Inactive),
        };
        if due {
            self.detect(world, presenter);
        }

        let mesh = self.view_mesh(world);
        renderer.upload(&mesh);
        Ok(TickOutcome {
            detected: due,
            mesh,
        })
    }
}
