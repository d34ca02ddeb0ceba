//! Logging transport service.
//!
//! `TransportLogging<S>` wraps any `tower::Service` that sends HTTP requests.
//! Each call gets its own [`Exchange`]; the request header is logged before the
//! call is delegated, the response header when the inner future resolves, and
//! both bodies are wrapped in [`CountingBody`].

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use hyper::body::Body;
use hyper::{Request, Response};
use pin_project::pin_project;
use tower::Service;

use crate::transport::body::CountingBody;
use crate::transport::exchange::{Direction, Exchange, Levels, Phase};

/// A transport that logs every exchange passing through it.
#[derive(Debug, Clone)]
pub struct TransportLogging<S> {
    inner: S,
    levels: Levels,
}

impl<S> TransportLogging<S> {
    pub(crate) fn new(inner: S, levels: Levels) -> Self {
        Self { inner, levels }
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for TransportLogging<S>
where
    S: Service<Request<CountingBody<ReqBody>>, Response = Response<ResBody>>,
    ResBody: Body,
{
    type Response = Response<CountingBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let exchange = Arc::new(Exchange::start(self.levels.clone()));
        exchange.log_request_header(request.method(), request.uri(), request.headers());

        let body_exchange = Arc::clone(&exchange);
        let request = request.map(|body| CountingBody::new(body, body_exchange, Direction::Request));

        ResponseFuture {
            inner: self.inner.call(request),
            exchange,
        }
    }
}

/// Response future of [`TransportLogging`].
#[pin_project]
#[derive(Debug)]
pub struct ResponseFuture<F> {
    #[pin]
    inner: F,
    exchange: Arc<Exchange>,
}

impl<F, ResBody, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<ResBody>, E>>,
    ResBody: Body,
{
    type Output = Result<Response<CountingBody<ResBody>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        let result = ready!(this.inner.poll(cx));

        let exchange = Arc::clone(this.exchange);

        match result {
            Ok(response) => {
                exchange.log_response_header(&response);
                let response =
                    response.map(|body| CountingBody::new(body, exchange, Direction::Response));
                // An empty body is never polled, so nothing else would close the exchange.
                if response.body().is_end_stream() {
                    response.body().exchange().advance(Phase::Completed);
                }
                Poll::Ready(Ok(response))
            }
            Err(err) => {
                exchange.advance(Phase::Completed);
                Poll::Ready(Err(err))
            }
        }
    }
}
