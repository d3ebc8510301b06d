use std::collections::{HashMap, VecDeque};
use embedded_hal::delay::DelayNs;
use math::Vector;
use crate::*;

mod gyro_calibration;
mod persistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadFailed;

/// Plays back scripted readings, `None` entries fail the read. An exhausted script keeps
/// returning the last fallback value.
/// 
pub struct ScriptedSource
{
    pub gyro: VecDeque<Option<Vector>>,
    pub accel: VecDeque<Option<Vector>>,
    pub gyro_fallback: Option<Vector>,
    pub accel_fallback: Option<Vector>,
    pub gyro_reads: usize,
    pub accel_reads: usize,
}

impl ScriptedSource
{
    pub fn new() -> Self {
        ScriptedSource {
            gyro: VecDeque::new(),
            accel: VecDeque::new(),
            gyro_fallback: None,
            accel_fallback: None,
            gyro_reads: 0,
            accel_reads: 0,
        }
    }

    pub fn constant_gyro(value: Vector) -> Self {
        let mut source = Self::new();
        source.gyro_fallback = Some(value);
        source
    }
}

impl SampleSource for ScriptedSource
{
    type Error = ReadFailed;

    fn read_gyro(&mut self) -> Result<Vector, ReadFailed> {
        self.gyro_reads += 1;
        self.gyro.pop_front().unwrap_or(self.gyro_fallback).ok_or(ReadFailed)
    }

    fn read_accel(&mut self) -> Result<Vector, ReadFailed> {
        self.accel_reads += 1;
        self.accel.pop_front().unwrap_or(self.accel_fallback).ok_or(ReadFailed)
    }
}

/// Delay that returns immediately but keeps track of how long it was asked to wait.
/// 
#[derive(Default)]
pub struct NoDelay
{
    pub total_ns: u64,
}

impl DelayNs for NoDelay
{
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += ns as u64;
    }
}

#[derive(Default)]
pub struct MemoryStore
{
    pub blobs: HashMap<String, Vec<u8>>,
    pub fail_saves: bool,
}

impl BlobStore for MemoryStore
{
    type Error = ReadFailed;

    fn save_blob(&mut self, key: &str, data: &[u8]) -> Result<(), ReadFailed> {
        if self.fail_saves {
            return Err(ReadFailed);
        }
        self.blobs.insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn read_blob(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, ReadFailed> {
        Ok(self.blobs.get(key).map(|blob| {
            let len = blob.len().min(buf.len());
            buf[..len].copy_from_slice(&blob[..len]);
            len
        }))
    }
}

/// Records every observer callback for later inspection.
/// 
#[derive(Default)]
pub struct RecordingObserver
{
    pub started: Vec<CalibrationKind>,
    pub requested: Vec<Pose>,
    pub rejected: Vec<(Pose, f32)>,
    pub completed: Vec<(Pose, f32)>,
    pub finished: Vec<(CalibrationKind, bool)>,
}

impl CalibrationObserver for RecordingObserver
{
    fn calibration_started(&mut self, kind: CalibrationKind) {
        self.started.push(kind);
    }

    fn pose_requested(&mut self, pose: Pose) {
        self.requested.push(pose);
    }

    fn pose_rejected(&mut self, pose: Pose, reading: f32) {
        self.rejected.push((pose, reading));
    }

    fn pose_completed(&mut self, pose: Pose, mean: f32) {
        self.completed.push((pose, mean));
    }

    fn calibration_finished(&mut self, kind: CalibrationKind, success: bool) {
        self.finished.push((kind, success));
    }
}

/// Accelerometer reading of a sensor with the given bias and sensitivity held in `pose`.
/// 
pub fn face_reading(pose: Pose, bias: Vector, counts_per_g: f32) -> Vector {
    let mut reading = bias;
    let axis = pose.axis();
    reading.set_axis(axis, bias.axis(axis) + pose.sign() * counts_per_g);
    reading
}
