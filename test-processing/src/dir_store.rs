use std::{fs, io, path::PathBuf};
use processing::BlobStore;

/// Stores every blob as `<key>.bin` inside a directory, stands in for the on device flash
/// key/value store when replaying recordings on the host.
/// 
pub struct DirStore
{
    dir: PathBuf,
}

impl DirStore
{
    pub fn new(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(DirStore { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.bin", key))
    }
}

impl BlobStore for DirStore
{
    type Error = io::Error;

    fn save_blob(&mut self, key: &str, data: &[u8]) -> Result<(), io::Error> {
        fs::write(self.path(key), data)
    }

    fn read_blob(&mut self, key: &str, buf: &mut [u8]) -> Result<Option<usize>, io::Error> {
        match fs::read(self.path(key)) {
            Ok(blob) => {
                let len = blob.len().min(buf.len());
                buf[..len].copy_from_slice(&blob[..len]);
                Ok(Some(len))
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }
}
