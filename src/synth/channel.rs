// ParameterChannel - latest-value-wins handoff with dual SPSC queues
//
// Carries ParameterSets from the motion thread to the audio thread without
// the audio thread ever allocating or freeing. Sets circulate between two
// lock-free ring buffers:
//
// - DATA_QUEUE: publisher pushes filled sets, receiver pops them
// - RECYCLE_QUEUE: receiver returns sets it no longer needs, publisher
//   refills them
//
// Set flow:
// 1. Publisher takes an empty set from RECYCLE_QUEUE and copies into it
// 2. Publisher pushes it to DATA_QUEUE; if full, it is held as pending and
//    overwritten by the next publish
// 3. Receiver drains DATA_QUEUE at a buffer boundary, keeps the newest set
// 4. Receiver pushes every superseded set back to RECYCLE_QUEUE
//
// All sets are allocated up front with `max_waves` capacity. At most
// `capacity + 2` sets exist (queued, pending, and the receiver's current
// one), so the recycle queue always has room for the ones coming back.

use rtrb::{Consumer, Producer, PushError, RingBuffer};

use crate::mapping::ParameterSet;

/// Motion-side end of the channel
pub struct ParameterPublisher {
    data_producer: Producer<ParameterSet>,
    recycle_consumer: Consumer<ParameterSet>,
    pending: Option<ParameterSet>,
    last: ParameterSet,
    max_waves: usize,
    published: u64,
    superseded: u64,
    truncation_logged: bool,
}

/// Audio-side end of the channel
pub struct ParameterReceiver {
    data_consumer: Consumer<ParameterSet>,
    recycle_producer: Producer<ParameterSet>,
    latest: Option<ParameterSet>,
}

/// Constructor for the publisher/receiver pair
pub struct ParameterChannel;

impl ParameterChannel {
    /// Create a connected publisher and receiver
    ///
    /// # Arguments
    /// * `capacity` - Sets that may wait in the data queue
    /// * `max_waves` - Longest set delivered; longer sets are truncated
    ///
    /// # Panics
    /// Panics if `capacity` or `max_waves` is 0
    #[allow(clippy::new_ret_no_self)]
    pub fn new(capacity: usize, max_waves: usize) -> (ParameterPublisher, ParameterReceiver) {
        assert!(capacity > 0, "channel capacity must be greater than 0");
        assert!(max_waves > 0, "max_waves must be greater than 0");

        let circulating = capacity + 2;
        let (data_producer, data_consumer) = RingBuffer::new(capacity);
        let (mut recycle_producer, recycle_consumer) = RingBuffer::new(circulating);

        for _ in 0..circulating {
            // queue was just created with exactly this many slots
            let _ = recycle_producer.push(ParameterSet::with_capacity(max_waves));
        }

        (
            ParameterPublisher {
                data_producer,
                recycle_consumer,
                pending: None,
                last: ParameterSet::with_capacity(max_waves),
                max_waves,
                published: 0,
                superseded: 0,
                truncation_logged: false,
            },
            ParameterReceiver {
                data_consumer,
                recycle_producer,
                latest: None,
            },
        )
    }
}

impl ParameterPublisher {
    /// Publish a set, replacing any set still waiting for queue space
    ///
    /// # Returns
    /// `true` if the set reached the data queue, `false` if it is held as
    /// pending until [`ParameterPublisher::flush`] or the next publish.
    pub fn publish(&mut self, set: &ParameterSet) -> bool {
        if set.len() > self.max_waves && !self.truncation_logged {
            log::warn!(
                "[ParameterChannel] Truncating sets of {} waves to {}",
                set.len(),
                self.max_waves
            );
            self.truncation_logged = true;
        }
        self.last.copy_prefix_from(set, self.max_waves);
        self.send(set)
    }

    /// Publish the last set again with every amplitude at 0
    ///
    /// Pitches are held so the bank fades out instead of gliding.
    pub fn publish_muted(&mut self) -> bool {
        self.last.mute();
        let last = std::mem::take(&mut self.last);
        let delivered = self.send(&last);
        self.last = last;
        delivered
    }

    /// The set most recently sent; silent after `publish_muted`
    pub fn last_published(&self) -> &ParameterSet {
        &self.last
    }

    fn send(&mut self, set: &ParameterSet) -> bool {
        let mut buffer = match self.pending.take() {
            Some(stale) => {
                self.superseded += 1;
                stale
            }
            None => self
                .recycle_consumer
                .pop()
                .unwrap_or_else(|_| ParameterSet::with_capacity(self.max_waves)),
        };
        buffer.copy_prefix_from(set, self.max_waves);

        self.published += 1;
        self.pending = Some(buffer);
        self.flush()
    }

    /// Retry pushing the pending set
    ///
    /// # Returns
    /// `true` when nothing is left pending
    pub fn flush(&mut self) -> bool {
        let Some(buffer) = self.pending.take() else {
            return true;
        };
        match self.data_producer.push(buffer) {
            Ok(()) => true,
            Err(PushError::Full(buffer)) => {
                self.pending = Some(buffer);
                false
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total sets sent, muted ones included
    pub fn published(&self) -> u64 {
        self.published
    }

    /// Pending sets overwritten before they reached the queue
    pub fn superseded(&self) -> u64 {
        self.superseded
    }

    /// False once the receiver has been dropped
    pub fn is_connected(&self) -> bool {
        !self.data_producer.is_abandoned()
    }
}

impl ParameterReceiver {
    /// Take the newest set published since the last call
    ///
    /// Real-time safe: never allocates or frees. Older sets found in the
    /// queue are recycled unread.
    pub fn receive(&mut self) -> Option<&ParameterSet> {
        let mut newest = None;
        while let Ok(set) = self.data_consumer.pop() {
            if let Some(stale) = newest.replace(set) {
                self.recycle(stale);
            }
        }

        let newest = newest?;
        if let Some(stale) = self.latest.replace(newest) {
            self.recycle(stale);
        }
        self.latest.as_ref()
    }

    /// The set most recently returned by `receive`
    pub fn latest(&self) -> Option<&ParameterSet> {
        self.latest.as_ref()
    }

    fn recycle(&mut self, mut set: ParameterSet) {
        set.clear();
        // sized so this cannot fail while the publisher is alive
        let _ = self.recycle_producer.push(set);
    }
}
