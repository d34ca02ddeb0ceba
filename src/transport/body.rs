//! Counting body wrapper.
//!
//! # Responsibilities
//! - Forward every frame of the inner body unchanged
//! - Log the size of each data frame as it passes through
//! - Log a summary once the body ends, or when it is dropped after producing data
//!
//! # Design Decisions
//! - Counting happens per frame, the body is never buffered
//! - `is_end_stream` and `size_hint` are forwarded so content-length survives
//! - Dropping the wrapper drops the inner body, which releases the connection

use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use hyper::body::{Body, Buf, Frame, SizeHint};
use pin_project::{pin_project, pinned_drop};

use crate::transport::exchange::{Direction, Exchange, Phase};

/// A body that logs the bytes flowing through it.
#[pin_project(PinnedDrop)]
#[derive(Debug)]
pub struct CountingBody<B> {
    #[pin]
    inner: B,
    exchange: Arc<Exchange>,
    direction: Direction,
    total: u64,
    finished: bool,
}

impl<B> CountingBody<B> {
    pub(crate) fn new(inner: B, exchange: Arc<Exchange>, direction: Direction) -> Self {
        Self {
            inner,
            exchange,
            direction,
            total: 0,
            finished: false,
        }
    }

    /// Bytes that have passed through so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Exchange this body belongs to.
    pub fn exchange(&self) -> &Exchange {
        &self.exchange
    }
}

fn finish(exchange: &Exchange, direction: Direction, total: u64) {
    exchange.log_summary(direction, total, true);
    // A response body only exists once the call has returned.
    if direction == Direction::Response {
        exchange.advance(Phase::Completed);
    }
}

impl<B: Body> Body for CountingBody<B> {
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();
        if *this.finished {
            return Poll::Ready(None);
        }

        let frame = ready!(this.inner.as_mut().poll_frame(cx));
        match &frame {
            Some(Ok(frame)) => {
                if let Some(data) = frame.data_ref() {
                    let n = data.remaining() as u64;
                    *this.total += n;
                    this.exchange.log_chunk(*this.direction, n);
                }
                // hyper stops polling once the body reports its end, so the
                // trailing `None` may never be observed.
                if this.inner.is_end_stream() {
                    *this.finished = true;
                    finish(this.exchange, *this.direction, *this.total);
                }
            }
            // Errors pass through untouched; the summary is left to drop.
            Some(Err(_)) => {}
            None => {
                *this.finished = true;
                finish(this.exchange, *this.direction, *this.total);
            }
        }
        Poll::Ready(frame)
    }

    fn is_end_stream(&self) -> bool {
        self.finished || self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

#[pinned_drop]
impl<B> PinnedDrop for CountingBody<B> {
    fn drop(self: Pin<&mut Self>) {
        let this = self.project();
        if !*this.finished && *this.total > 0 {
            this.exchange.log_summary(*this.direction, *this.total, false);
        }
    }
}
