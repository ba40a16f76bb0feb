//! `RadioSource` backed by an interleaved-I/Q WAV file, standing in for a
//! physical SDR driver (the actual hardware interface is outside this
//! crate's scope).

use num_complex::Complex64;
use radlink_core::errors::RadioError;
use radlink_core::radio::RadioSource;

pub struct WavIqSource {
    path: String,
    buffer_size: usize,
    reader: Option<hound::WavReader<std::io::BufReader<std::fs::File>>>,
}

impl WavIqSource {
    pub fn new(path: impl Into<String>, buffer_size: usize) -> Self {
        Self {
            path: path.into(),
            buffer_size: buffer_size.max(1),
            reader: None,
        }
    }
}

impl RadioSource for WavIqSource {
    fn open(&mut self) -> Result<(), RadioError> {
        let reader = hound::WavReader::open(&self.path).map_err(|e| RadioError::OpenFailed {
            device: self.path.clone(),
            reason: e.to_string(),
        })?;

        if reader.spec().channels != 2 {
            return Err(RadioError::OpenFailed {
                device: self.path.clone(),
                reason: format!(
                    "expected a 2-channel (I/Q) WAV file, found {} channels",
                    reader.spec().channels
                ),
            });
        }

        self.reader = Some(reader);
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Option<Vec<Complex64>>, RadioError> {
        let reader = self
            .reader
            .as_mut()
            .ok_or_else(|| RadioError::ReadFailed("source not open".to_string()))?;

        let bits = reader.spec().bits_per_sample;
        let full_scale = if bits >= 32 { 1.0 } else { (1i64 << (bits - 1)) as f64 };

        let mut samples = Vec::with_capacity(self.buffer_size);
        let mut iter = reader.samples::<i32>();

        for _ in 0..self.buffer_size {
            let Some(i_sample) = iter.next() else { break };
            let Some(q_sample) = iter.next() else { break };
            let i = i_sample.map_err(|e| RadioError::ReadFailed(e.to_string()))? as f64 / full_scale;
            let q = q_sample.map_err(|e| RadioError::ReadFailed(e.to_string()))? as f64 / full_scale;
            samples.push(Complex64::new(i, q));
        }

        if samples.is_empty() {
            Ok(None)
        } else {
            Ok(Some(samples))
        }
    }

    fn close(&mut self) -> Result<(), RadioError> {
        self.reader = None;
        Ok(())
    }
}
