//! Background sheet baker for non-blocking sprite rasterization.
//!
//! Rasterizing all three styles at a new size takes long enough to miss
//! frame deadlines, so it runs on a dedicated loader thread. The render
//! path polls for results with a non-blocking triple-buffer read; a
//! generation counter lets it discard completions that a newer request
//! has superseded.

use std::sync::mpsc;

use crate::sprite::sheet::SheetSet;

/// Request to bake all styles at one target size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BakeRequest {
    Bake {
        width: u32,
        height: u32,
        generation: u64,
    },
    Shutdown,
}

/// Background thread that rasterizes sprite sheets.
#[derive(Debug)]
pub struct SheetBaker {
    request_tx: mpsc::Sender<BakeRequest>,
    result: triple_buffer::Output<Option<SheetSet>>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl SheetBaker {
    /// Spawn the baker thread.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] if the thread fails to spawn.
    pub fn new() -> Result<Self, std::io::Error> {
        let (request_tx, request_rx) = mpsc::channel::<BakeRequest>();
        let (result_input, result_output) =
            triple_buffer::triple_buffer(&None);

        let thread = std::thread::Builder::new()
            .name("sheet-baker".into())
            .spawn(move || {
                Self::thread_loop(&request_rx, result_input);
            })?;

        Ok(Self {
            request_tx,
            result: result_output,
            thread: Some(thread),
        })
    }

    /// Queue a bake (non-blocking send).
    pub fn submit(&self, width: u32, height: u32, generation: u64) {
        let _ = self.request_tx.send(BakeRequest::Bake {
            width,
            height,
            generation,
        });
    }

    /// Non-blocking check for a completed set.
    pub fn try_recv(&mut self) -> Option<SheetSet> {
        let _ = self.result.update();
        self.result.output_buffer_mut().take()
    }

    /// Shut down the baker thread and wait for it to finish.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(BakeRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
        }
    }

    fn thread_loop(
        request_rx: &mpsc::Receiver<BakeRequest>,
        mut result: triple_buffer::Input<Option<SheetSet>>,
    ) {
        while let Ok(request) = request_rx.recv() {
            // Only the newest queued request matters; superseded bakes
            // would be discarded by generation anyway.
            let latest = drain_latest(request, request_rx);

            match latest {
                BakeRequest::Shutdown => break,
                BakeRequest::Bake {
                    width,
                    height,
                    generation,
                } => {
                    if width == 0 || height == 0 {
                        log::warn!(
                            "skipping bake of degenerate size \
                             {width}x{height} (gen {generation})"
                        );
                        continue;
                    }
                    let set = SheetSet::bake(width, height, generation);
                    if !set.is_valid() {
                        // Keep serving the previous generation rather
                        // than publishing a partial set.
                        log::error!(
                            "bake produced invalid sheet set at \
                             {width}x{height}, keeping previous"
                        );
                        continue;
                    }
                    log::debug!(
                        "baked sheet set {width}x{height} gen {generation}"
                    );
                    result.write(Some(set));
                }
            }
        }
    }
}

impl Drop for SheetBaker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Drain queued requests, keeping only the latest. `Shutdown` always
/// wins.
fn drain_latest(
    initial: BakeRequest,
    rx: &mpsc::Receiver<BakeRequest>,
) -> BakeRequest {
    let mut latest = initial;
    while let Ok(newer) = rx.try_recv() {
        if latest == BakeRequest::Shutdown {
            return latest;
        }
        latest = newer;
    }
    latest
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn bake_round_trip() {
        init_logs();
        let mut baker = SheetBaker::new().unwrap();
        baker.submit(24, 24, 3);

        let mut set = None;
        for _ in 0..200 {
            if let Some(s) = baker.try_recv() {
                set = Some(s);
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        let set = set.expect("baker never delivered");
        assert_eq!(set.generation, 3);
        assert_eq!(set.width, 24);
        assert!(set.is_valid());
        baker.shutdown();
    }

    #[test]
    fn newest_request_wins() {
        let mut baker = SheetBaker::new().unwrap();
        // Queue several; only the last generation needs to arrive.
        baker.submit(16, 16, 1);
        baker.submit(20, 20, 2);
        baker.submit(28, 28, 3);

        let mut last = None;
        for _ in 0..400 {
            if let Some(s) = baker.try_recv() {
                last = Some(s.generation);
                if last == Some(3) {
                    break;
                }
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(last, Some(3));
        baker.shutdown();
    }
}
