use std::io::{Read, Write};

/// Mirrors every byte read from `inner` into `mirror`, untransformed.
///
/// The framer's buffered reader and the human-visible passthrough both
/// pace off the single upstream read, so a slow consumer slows the other
/// branch instead of losing bytes.
///
/// A mirror write failure (the terminal side went away, e.g. stdout
/// piped into a consumer that exited) is not a stream error: the child's
/// bytes are still intact, so mirroring stops and framing continues.
pub struct Tee<R, W> {
    inner: R,
    mirror: Option<W>,
}

impl<R: Read, W: Write> Tee<R, W> {
    pub fn new(inner: R, mirror: W) -> Self {
        Self {
            inner,
            mirror: Some(mirror),
        }
    }
}

impl<R: Read, W: Write> Read for Tee<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let count = self.inner.read(buf)?;
        if count == 0 {
            return Ok(0);
        }
        let mirror_gone = match self.mirror.as_mut() {
            Some(mirror) => mirror
                .write_all(&buf[..count])
                .and_then(|()| mirror.flush())
                .is_err(),
            None => false,
        };
        if mirror_gone {
            tracing::debug!("passthrough sink gone, framing continues unmirrored");
            self.mirror = None;
        }
        Ok(count)
    }
}
