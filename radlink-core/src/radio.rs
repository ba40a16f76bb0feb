//! The boundary between this crate and a physical (or simulated) IQ
//! source. The acquisition loop only ever depends on `RadioSource`; the
//! concrete hardware driver lives outside this crate entirely and the
//! WAV-backed stand-in lives in the CLI crate.

use num_complex::Complex64;

use crate::errors::RadioError;

/// A source of IQ sample buffers. Implementations own whatever device
/// handle or file cursor is needed to produce the next buffer; `close`
/// releases it. `open`/`close` are explicit rather than RAII-only because
/// hardware sources may need to report a failure distinct from "no more
/// samples".
pub trait RadioSource {
    fn open(&mut self) -> Result<(), RadioError>;
    fn read_samples(&mut self) -> Result<Option<Vec<Complex64>>, RadioError>;
    fn close(&mut self) -> Result<(), RadioError>;
}

/// An in-memory IQ source for tests: replays a fixed sequence of buffers,
/// then reports end of stream.
pub struct VecIqSource {
    buffers: std::vec::IntoIter<Vec<Complex64>>,
}

impl VecIqSource {
    pub fn new(buffers: Vec<Vec<Complex64>>) -> Self {
        Self {
            buffers: buffers.into_iter(),
        }
    }
}

impl RadioSource for VecIqSource {
    fn open(&mut self) -> Result<(), RadioError> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Option<Vec<Complex64>>, RadioError> {
        Ok(self.buffers.next())
    }

    fn close(&mut self) -> Result<(), RadioError> {
        Ok(())
    }
}

/// A source that immediately reports end of stream. Useful for exercising
/// the acquisition loop's shutdown path without any sample data.
#[derive(Debug, Default)]
pub struct NullRadioSource;

impl RadioSource for NullRadioSource {
    fn open(&mut self) -> Result<(), RadioError> {
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Option<Vec<Complex64>>, RadioError> {
        Ok(None)
    }

    fn close(&mut self) -> Result<(), RadioError> {
        Ok(())
    }
}
