use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering, fence};

/// Latest scroll sample: offset in pixels, signed velocity in pixels per
/// frame, and the frame timestamp in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollSignal {
    pub scroll_offset: f32,
    pub velocity: f32,
    pub timestamp: f64,
}

/// Single-writer published value. Readers always see a whole signal from one
/// frame, never a mix of two. There is no queue; a read returns the latest.
pub struct ScrollSignalSlot {
    sequence: AtomicU64,
    scroll_offset: AtomicU32,
    velocity: AtomicU32,
    timestamp: AtomicU64,
}

impl ScrollSignalSlot {
    pub const fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
            scroll_offset: AtomicU32::new(0),
            velocity: AtomicU32::new(0),
            timestamp: AtomicU64::new(0),
        }
    }

    /// Must only be called from the scroll tracker.
    pub fn publish(&self, signal: ScrollSignal) {
        let sequence = self.sequence.load(Ordering::Relaxed);
        self.sequence.store(sequence.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        self.scroll_offset
            .store(signal.scroll_offset.to_bits(), Ordering::Relaxed);
        self.velocity
            .store(signal.velocity.to_bits(), Ordering::Relaxed);
        self.timestamp
            .store(signal.timestamp.to_bits(), Ordering::Relaxed);

        self.sequence
            .store(sequence.wrapping_add(2), Ordering::Release);
    }

    pub fn read(&self) -> ScrollSignal {
        loop {
            let before = self.sequence.load(Ordering::Acquire);
            if before % 2 == 1 {
                std::hint::spin_loop();
                continue;
            }

            let signal = ScrollSignal {
                scroll_offset: f32::from_bits(self.scroll_offset.load(Ordering::Relaxed)),
                velocity: f32::from_bits(self.velocity.load(Ordering::Relaxed)),
                timestamp: f64::from_bits(self.timestamp.load(Ordering::Relaxed)),
            };

            fence(Ordering::Acquire);
            if self.sequence.load(Ordering::Relaxed) == before {
                return signal;
            }
        }
    }

    /// Number of completed publishes.
    pub fn publish_count(&self) -> u64 {
        self.sequence.load(Ordering::Acquire) / 2
    }
}

impl Default for ScrollSignalSlot {
    fn default() -> Self {
        Self::new()
    }
}

/// The process-wide slot read by anything that wants scroll turbulence
/// without reaching into the ECS world.
pub static SCROLL_SIGNAL: ScrollSignalSlot = ScrollSignalSlot::new();

/// Slot the tracker publishes into. Defaults to [`SCROLL_SIGNAL`].
#[derive(Resource, Clone, Copy)]
pub struct ScrollSignalPublisher(pub &'static ScrollSignalSlot);

impl Default for ScrollSignalPublisher {
    fn default() -> Self {
        Self(&SCROLL_SIGNAL)
    }
}

impl ScrollSignalPublisher {
    pub fn latest(&self) -> ScrollSignal {
        self.0.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn readers_see_the_latest_publish() {
        let slot = ScrollSignalSlot::new();
        assert_eq!(slot.read(), ScrollSignal::default());

        slot.publish(ScrollSignal {
            scroll_offset: 680.0,
            velocity: 12.5,
            timestamp: 1.25,
        });
        slot.publish(ScrollSignal {
            scroll_offset: 700.0,
            velocity: 20.0,
            timestamp: 1.5,
        });

        let signal = slot.read();
        assert_eq!(signal.scroll_offset, 700.0);
        assert_eq!(signal.velocity, 20.0);
        assert_eq!(slot.publish_count(), 2);
    }

    #[test]
    fn concurrent_readers_never_observe_torn_signals() {
        let slot: &'static ScrollSignalSlot = Box::leak(Box::new(ScrollSignalSlot::new()));
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));

        let readers: Vec<_> = (0..3)
            .map(|_| {
                let done = done.clone();
                thread::spawn(move || {
                    while !done.load(Ordering::Relaxed) {
                        let signal = slot.read();
                        // Every publish writes offset == velocity * 2 == timestamp * 4.
                        assert_eq!(signal.scroll_offset, signal.velocity * 2.0);
                        assert_eq!(signal.scroll_offset as f64, signal.timestamp * 4.0);
                    }
                })
            })
            .collect();

        for frame in 0..20_000u32 {
            let offset = frame as f32;
            slot.publish(ScrollSignal {
                scroll_offset: offset,
                velocity: offset / 2.0,
                timestamp: offset as f64 / 4.0,
            });
        }
        done.store(true, Ordering::Relaxed);

        for reader in readers {
            reader.join().unwrap();
        }
    }
}
