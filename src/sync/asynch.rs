//! Async/await support for transfer completion.
//!
//! Each channel owns one waker slot. The interrupt handlers wake it after a
//! completion, period or error of that channel, and [`Edma::terminate`] and
//! [`Edma::release_channel`] wake it so a pending future can observe the
//! abort.

use core::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::dma::Cookie;
use crate::driver::channel::CookieState;
use crate::driver::config::ChannelStatus;
use crate::driver::edma::Edma;
use crate::driver::error::{DmaError, Result};
use crate::internal::register::RegisterIo;

/// Future resolving when a submitted transfer finishes.
///
/// Resolves to:
/// - `Ok(())` once the cookie has completed
/// - `HardwareError` if the channel faulted first
/// - `Aborted` if the transfer was dropped by terminate or release
///
/// A cyclic transfer never completes; its future resolves only on abort.
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct CompletionFuture<
    'a,
    R: RegisterIo,
    const CHANNELS: usize,
    const POOL: usize,
    const QUEUE: usize,
> {
    edma: &'a Edma<R, CHANNELS, POOL, QUEUE>,
    ch: usize,
    cookie: Cookie,
}

impl<'a, R: RegisterIo, const CHANNELS: usize, const POOL: usize, const QUEUE: usize>
    CompletionFuture<'a, R, CHANNELS, POOL, QUEUE>
{
    /// Create a future for `cookie` on channel `ch`.
    pub fn new(edma: &'a Edma<R, CHANNELS, POOL, QUEUE>, ch: usize, cookie: Cookie) -> Self {
        Self { edma, ch, cookie }
    }

    fn check(&self) -> Poll<Result<()>> {
        let cookie = self.cookie;
        let state = self.edma.with_channel(self.ch, |channel, _| {
            (channel.cookie_state(cookie), channel.status())
        });
        match state {
            Err(e) => Poll::Ready(Err(e)),
            Ok((CookieState::Complete, _)) => Poll::Ready(Ok(())),
            Ok((_, ChannelStatus::Error)) => Poll::Ready(Err(DmaError::HardwareError.into())),
            Ok((CookieState::Active | CookieState::Queued, _)) => Poll::Pending,
            Ok((CookieState::Unknown, _)) => Poll::Ready(Err(DmaError::Aborted.into())),
        }
    }
}

impl<R: RegisterIo, const CHANNELS: usize, const POOL: usize, const QUEUE: usize> Future
    for CompletionFuture<'_, R, CHANNELS, POOL, QUEUE>
{
    type Output = Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if let Poll::Ready(result) = this.check() {
            return Poll::Ready(result);
        }
        if let Some(waker) = this.edma.waker(this.ch) {
            waker.register(cx.waker());
        }
        this.check()
    }
}

impl<R: RegisterIo, const CHANNELS: usize, const POOL: usize, const QUEUE: usize>
    Edma<R, CHANNELS, POOL, QUEUE>
{
    /// Wait until `cookie` on channel `ch` finishes.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let cookie = EDMA.submit(ch, set)?;
    /// EDMA.issue_pending(ch)?;
    /// EDMA.wait_for_completion(ch, cookie).await?;
    /// ```
    pub fn wait_for_completion(
        &self,
        ch: usize,
        cookie: Cookie,
    ) -> CompletionFuture<'_, R, CHANNELS, POOL, QUEUE> {
        CompletionFuture::new(self, ch, cookie)
    }
}
