use crate::codec::TextField;
use crate::skiplist::SkipList;
use crate::Error;
use fs2::FileExt;
use memmap2::Mmap;
use rand::Rng;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

impl<K, V, R> SkipList<K, V, R>
where
    K: TextField,
    V: TextField,
{
    /// Writes [`encode`](SkipList::encode) output to `path`, replacing the
    /// file.
    ///
    /// The dump is written to a temporary file in the same directory, synced,
    /// then renamed over `path`, so the target always holds either the old or
    /// the new dump. The target is held under an exclusive lock meanwhile.
    pub fn dump_file<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let path = path.as_ref();
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let target = OpenOptions::new().create(true).write(true).open(path)?;
        FileExt::lock_exclusive(&target)?;

        let tmp = NamedTempFile::new_in(dir)?;
        let mut writer = BufWriter::new(tmp.as_file());
        writer.write_all(self.encode().as_bytes())?;
        writer.flush()?;
        drop(writer);
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        FileExt::unlock(&target)?;
        Ok(())
    }
}

impl<K, V, R> SkipList<K, V, R>
where
    K: Ord + TextField,
    V: TextField,
    R: Rng,
{
    /// Replaces the contents of the list with a dump read from `path`.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> crate::Result<()> {
        let file = File::open(path)?;
        FileExt::lock_shared(&file)?;
        let res = if file.metadata()?.len() == 0 {
            self.decode_into("")
        } else {
            let mmap = unsafe { Mmap::map(&file)? };
            match std::str::from_utf8(&mmap) {
                Ok(text) => self.decode_into(text),
                Err(e) => {
                    let line = mmap[..e.valid_up_to()]
                        .iter()
                        .filter(|b| **b == b'\n')
                        .count()
                        + 1;
                    Err(Error::parse(line, "invalid utf-8"))
                }
            }
        };
        FileExt::unlock(&file)?;
        res
    }
}
