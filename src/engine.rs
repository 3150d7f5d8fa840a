use crate::{
    classify::{self, Arm, PoseClassification},
    cooldown::{Cooldown, Event},
    decode::Decoder,
    error::Error,
    pose::Frame,
};
use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{sync_channel, Sender, SyncSender},
    },
    time::{Duration, Instant},
};
use tracing::{debug, info, warn};

/// Feeds decoded frames through a bounded channel into the classifier.
pub struct Engine<D> {
    decoder: D,
    queue_size: usize,
    cooldown: Cooldown,
    skip_invalid: bool,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct Timing {
    pub classification: Duration,
    pub frames: usize,
}

#[derive(Debug, Clone)]
pub struct Report {
    pub frame: usize,
    pub classifications: Vec<PoseClassification>,
    /// Empty while a previous detection is cooling down. A frame that ends
    /// the cooldown carries the reset followed by its own outcome.
    pub events: Vec<Event>,
    pub timing: Timing,
}

impl Report {
    pub fn is_flexed(&self) -> bool {
        self.classifications.iter().any(|c| c.is_flexed())
    }

    pub fn flexed_arms(&self) -> Vec<Arm> {
        Arm::BOTH
            .iter()
            .copied()
            .filter(|&arm| self.classifications.iter().any(|c| c.arm(arm)))
            .collect()
    }
}

impl<D> Engine<D>
where
    D: Decoder + Sync,
{
    pub fn new(decoder: D, queue_size: usize, cooldown: Cooldown) -> Result<Self, Error> {
        if queue_size == 0 {
            return Err(Error::ZeroQueueSize);
        }
        Ok(Self {
            decoder,
            queue_size,
            cooldown,
            skip_invalid: false,
        })
    }

    /// Log and skip lines that fail to decode instead of stopping.
    pub fn skip_invalid(mut self, skip_invalid: bool) -> Self {
        self.skip_invalid = skip_invalid;
        self
    }

    fn produce<R: BufRead>(
        &self,
        input: R,
        running: &AtomicBool,
        frames_tx: SyncSender<Frame>,
    ) -> Result<(), Error> {
        for (number, line) in input.lines().enumerate() {
            if !running.load(Ordering::SeqCst) {
                debug!(frame = number, "stopping early");
                break;
            }
            let line = line.map_err(Error::ReadLine)?;
            let observations = match self.decoder.decode(&line) {
                Ok(observations) => observations,
                Err(e) if self.skip_invalid => {
                    warn!(line = number + 1, error = %e, "skipping invalid line");
                    continue;
                }
                Err(e) => return Err(Error::DecodeLine(Box::new(e), number + 1)),
            };
            frames_tx
                .send(Frame {
                    number,
                    observations,
                })
                .map_err(|_| Error::SendFrame(number))?;
        }
        Ok(())
    }

    /// Process every line of `input`, sending one report per frame.
    ///
    /// Returns once the input is exhausted or `running` is cleared, and every
    /// frame read so far has been reported.
    pub fn run<R>(
        &self,
        input: R,
        running: &AtomicBool,
        reports_tx: Sender<Report>,
    ) -> Result<Timing, Error>
    where
        R: BufRead + Send,
    {
        let (frames_tx, frames_rx) = sync_channel::<Frame>(self.queue_size);
        let mut cooldown = self.cooldown.clone();

        crossbeam::thread::scope(|scope| {
            let producer = scope.spawn(move |_| self.produce(input, running, frames_tx));

            let consumer = scope.spawn(move |_| {
                let mut timing = Timing::default();
                for frame in frames_rx {
                    let start = Instant::now();
                    let classifications = frame
                        .observations
                        .iter()
                        .map(classify::classify)
                        .collect::<Vec<_>>();
                    timing.classification += start.elapsed();
                    timing.frames += 1;

                    let report = Report {
                        frame: frame.number,
                        classifications,
                        events: Vec::new(),
                        timing,
                    };
                    let events = cooldown.observe(report.is_flexed(), Instant::now());
                    for event in &events {
                        match event {
                            Event::Detected => info!(
                                frame = frame.number,
                                arms = ?report.flexed_arms(),
                                "flexed bicep detected"
                            ),
                            Event::Reset => {
                                info!(frame = frame.number, "resetting body detection")
                            }
                            Event::NotDetected => debug!(
                                frame = frame.number,
                                bodies = report.classifications.len(),
                                "no flexed bicep detected"
                            ),
                        }
                    }

                    reports_tx
                        .send(Report { events, ..report })
                        .map_err(|_| Error::SendReport(frame.number))?;
                }
                Ok::<_, Error>(timing)
            });

            let produced = producer.join().map_err(|_| Error::ThreadPanicked)?;
            let timing = consumer.join().map_err(|_| Error::ThreadPanicked)??;
            produced?;
            Ok::<_, Error>(timing)
        })
        .map_err(|_| Error::ThreadPanicked)?
    }
}
