use crate::Pose;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationKind
{
    Gyro,
    Accel,
}

/// Receives human readable progress of the calibration routines, e.g. to prompt the operator to
/// flip the device to the next pose. Every method defaults to doing nothing, `()` is the no-op
/// observer.
/// 
pub trait CalibrationObserver
{
    fn calibration_started(&mut self, _kind: CalibrationKind) {}

    /// The operator should now hold the device in `pose`.
    fn pose_requested(&mut self, _pose: Pose) {}

    /// A reading on the pose's target axis was too far from the expected reference value.
    fn pose_rejected(&mut self, _pose: Pose, _reading: f32) {}

    fn pose_completed(&mut self, _pose: Pose, _mean: f32) {}

    fn calibration_finished(&mut self, _kind: CalibrationKind, _success: bool) {}
}

impl CalibrationObserver for () {}

impl<T: CalibrationObserver + ?Sized> CalibrationObserver for &mut T
{
    fn calibration_started(&mut self, kind: CalibrationKind) {
        (**self).calibration_started(kind)
    }

    fn pose_requested(&mut self, pose: Pose) {
        (**self).pose_requested(pose)
    }

    fn pose_rejected(&mut self, pose: Pose, reading: f32) {
        (**self).pose_rejected(pose, reading)
    }

    fn pose_completed(&mut self, pose: Pose, mean: f32) {
        (**self).pose_completed(pose, mean)
    }

    fn calibration_finished(&mut self, kind: CalibrationKind, success: bool) {
        (**self).calibration_finished(kind, success)
    }
}

/// Forwards calibration progress to the `log` facade.
/// 
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CalibrationObserver for LogObserver
{
    fn calibration_started(&mut self, kind: CalibrationKind) {
        log::info!("{:?} calibration started, keep the device still", kind);
    }

    fn pose_requested(&mut self, pose: Pose) {
        log::info!("Hold the device with {} pointing up", pose.label());
    }

    fn pose_rejected(&mut self, pose: Pose, reading: f32) {
        log::warn!("Pose {} not held (read {}), reposition the device", pose.label(), reading);
    }

    fn pose_completed(&mut self, pose: Pose, mean: f32) {
        log::info!("Pose {} done, mean {}", pose.label(), mean);
    }

    fn calibration_finished(&mut self, kind: CalibrationKind, success: bool) {
        if success {
            log::info!("{:?} calibration succeeded", kind);
        } else {
            log::error!("{:?} calibration failed", kind);
        }
    }
}
