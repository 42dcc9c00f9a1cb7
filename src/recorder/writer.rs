//! One writer per subscribed characteristic: owns the output file, consumes
//! the characteristic's frame stream, decodes and appends CSV rows, and
//! publishes the latest decoded sample for live display.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::ble::transport::{Frame, Transport};
use crate::ble::{BleUuid, CharacteristicLabel};
use crate::decode::{DecodedSample, Decoder};
use crate::error::{ConnectError, RecordingError};

pub struct NotificationsWriter {
    decoder: Decoder,
    transport: Arc<dyn Transport>,
    recording_enabled: bool,
    publishing_enabled: bool,
    recording_path: PathBuf,
    base_filename: String,
    /// Held between configure() and start(); the consumption task takes
    /// ownership so the handle is released on every exit path.
    output_file: Option<File>,
    task: Option<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
    published: watch::Sender<DecodedSample>,
}

impl NotificationsWriter {
    pub fn new(
        transport: Arc<dyn Transport>,
        decoder: Decoder,
        recording_enabled: bool,
        recording_path: PathBuf,
        publishing_enabled: bool,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        let (published, _) = watch::channel(decoder.empty_sample());
        Self {
            base_filename: format!("ble_spec-{}", decoder.label().file_stem()),
            decoder,
            transport,
            recording_enabled,
            publishing_enabled,
            recording_path,
            output_file: None,
            task: None,
            shutdown,
            published,
        }
    }

    pub fn label(&self) -> CharacteristicLabel {
        self.decoder.label()
    }

    pub fn characteristic_id(&self) -> BleUuid {
        self.decoder.characteristic_id()
    }

    pub fn decoder(&self) -> Decoder {
        self.decoder
    }

    pub fn is_recording(&self) -> bool {
        self.task.is_some()
    }

    pub fn publishing_enabled(&self) -> bool {
        self.publishing_enabled
    }

    /// Latest decoded sample, primed with the decoder's empty sample.
    pub fn subscribe(&self) -> watch::Receiver<DecodedSample> {
        self.published.subscribe()
    }

    /// Create the output files: the companion info file and the data file
    /// with its header row. An existing data file is a hard error, never
    /// silently overwritten.
    pub fn configure(&mut self) -> Result<(), ConnectError> {
        if !self.recording_enabled {
            return Ok(());
        }

        let info_path = self
            .recording_path
            .join(format!("{}-info.csv", self.base_filename));
        fs::write(&info_path, self.decoder.info_description()).map_err(|source| {
            ConnectError::OutputFile {
                path: info_path.clone(),
                source,
            }
        })?;

        let data_path = self.recording_path.join(format!("{}.csv", self.base_filename));
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&data_path)
            .map_err(|source| {
                if source.kind() == io::ErrorKind::AlreadyExists {
                    ConnectError::OutputFileExists {
                        path: data_path.clone(),
                    }
                } else {
                    ConnectError::OutputFile {
                        path: data_path.clone(),
                        source,
                    }
                }
            })?;
        file.write_all(self.decoder.csv_header().as_bytes())
            .map_err(|source| ConnectError::OutputFile {
                path: data_path.clone(),
                source,
            })?;

        self.output_file = Some(file);
        Ok(())
    }

    /// Subscribe to the characteristic and spawn the consumption task.
    /// Idempotent: a writer that is already running is left alone.
    pub async fn start(&mut self) -> Result<(), RecordingError> {
        if self.is_recording() {
            return Ok(());
        }

        let stream = self
            .transport
            .notifications(&self.decoder.characteristic_id())
            .await?;

        let _ = self.shutdown.send(false);
        let task = tokio::spawn(consume_stream(
            stream,
            self.decoder,
            self.output_file.take().filter(|_| self.recording_enabled),
            self.publishing_enabled.then(|| self.published.clone()),
            self.shutdown.subscribe(),
        ));
        self.task = Some(task);

        log::info!(
            "started recording from characteristic '{}'",
            self.decoder.label().description()
        );
        Ok(())
    }

    /// Unsubscribe and wait for the consumption task to finish. Idempotent:
    /// a writer that never started is a no-op.
    pub async fn stop(&mut self) -> Result<(), RecordingError> {
        let Some(task) = self.task.take() else {
            return Ok(());
        };

        let _ = self.shutdown.send(true);

        let stop_result = self
            .transport
            .stop_notifications(&self.decoder.characteristic_id())
            .await
            .map_err(|error| {
                RecordingError::FailedToStop(format!(
                    "could not unsubscribe from characteristic '{}': {error}",
                    self.decoder.characteristic_id()
                ))
            });

        if let Err(error) = task.await {
            log::warn!(
                "consumption task for '{}' did not stop cleanly: {error}",
                self.decoder.label().description()
            );
        }

        log::info!(
            "stopped recording from characteristic '{}'",
            self.decoder.label().description()
        );
        stop_result
    }
}

/// The per-characteristic consumption loop. Frames are processed strictly
/// in arrival order; a frame that fails to decode is logged and dropped
/// without terminating the stream. The loop ends when the stream closes or
/// the shutdown flag is raised.
async fn consume_stream(
    mut stream: mpsc::Receiver<Frame>,
    decoder: Decoder,
    mut output_file: Option<File>,
    publish: Option<watch::Sender<DecodedSample>>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow_and_update() {
                    break;
                }
            }
            frame = stream.recv() => {
                let Some(frame) = frame else { break };
                match decoder.decode(&frame) {
                    Ok(Some(sample)) => {
                        if let Some(file) = output_file.as_mut() {
                            if let Err(error) = file.write_all(sample.csv_rows().as_bytes()) {
                                log::warn!(
                                    "write failed for characteristic '{}': {error}",
                                    decoder.label().description()
                                );
                            }
                        }
                        if let Some(publish) = &publish {
                            let _ = publish.send(sample);
                        }
                    }
                    Ok(None) => {
                        log::trace!(
                            "empty frame from characteristic '{}'",
                            decoder.label().description()
                        );
                    }
                    Err(error) => {
                        log::warn!(
                            "dropping frame from characteristic '{}': {error}",
                            decoder.label().description()
                        );
                    }
                }
            }
        }
    }
    // output_file dropped here, releasing the handle on every exit path
}
