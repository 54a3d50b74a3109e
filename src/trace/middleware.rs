//! Tower layer wrapping a variant's handler with the tracing pipeline.
//!
//! The wrapper runs before the handler (extract incoming context, start the
//! span, decide sampling) and after it (finish the span, hand it to the
//! reporter). The hot path does no logging and no allocation beyond the
//! span itself.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body;
use axum::http::Request;
use tower::{Layer, Service};

use crate::trace::Tracer;

/// Installs [`TraceService`] around a variant's route tree.
#[derive(Clone)]
pub struct TraceLayer {
    tracer: Tracer,
}

impl TraceLayer {
    pub fn new(tracer: Tracer) -> Self {
        Self { tracer }
    }
}

impl<S> Layer<S> for TraceLayer {
    type Service = TraceService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TraceService {
            inner,
            tracer: self.tracer.clone(),
        }
    }
}

/// Per-request span lifecycle around the inner service.
#[derive(Clone)]
pub struct TraceService<S> {
    inner: S,
    tracer: Tracer,
}

impl<S> Service<Request<Body>> for TraceService<S>
where
    S: Service<Request<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future =
        Pin<Box<dyn Future<Output = Result<S::Response, S::Error>> + Send + 'static>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let tracer = self.tracer.clone();
        let parent = tracer.extract_context(request.headers());
        let span = tracer.new_span(parent);

        // Swap keeps the polled-ready instance, per tower's Clone contract.
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let response = inner.call(request).await?;
            tracer.finish_span(span);
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{HeaderValue, StatusCode};
    use tower::ServiceExt;

    use crate::handler;
    use crate::trace::propagation::B3_TRACE_ID;
    use crate::trace::{FinishedSpan, Reporter, TraceId, TracingPolicy};

    #[derive(Default)]
    struct SpyReporter {
        spans: Mutex<Vec<FinishedSpan>>,
    }

    impl Reporter for SpyReporter {
        fn report(&self, span: FinishedSpan) {
            self.spans.lock().unwrap().push(span);
        }
    }

    fn traced_app(policy: TracingPolicy) -> (axum::Router, Arc<SpyReporter>) {
        let spy = Arc::new(SpyReporter::default());
        let tracer = Tracer::new(policy, spy.clone());
        let app = axum::Router::new()
            .route("/", axum::routing::get(handler::hello))
            .layer(TraceLayer::new(tracer));
        (app, spy)
    }

    #[tokio::test]
    async fn span_finishes_after_handler() {
        let (app, spy) = traced_app(TracingPolicy::sampled());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let spans = spy.spans.lock().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].context.sampled);
    }

    #[tokio::test]
    async fn never_sampler_emits_nothing() {
        let (app, spy) = traced_app(TracingPolicy::unsampled());
        let response = app
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(spy.spans.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn incoming_context_is_continued() {
        let (app, spy) = traced_app(TracingPolicy::sampled());
        let mut request = Request::get("/").body(Body::empty()).unwrap();
        request.headers_mut().insert(
            B3_TRACE_ID,
            HeaderValue::from_static("0af7651916cd43dd"),
        );
        request.headers_mut().insert(
            crate::trace::propagation::B3_SPAN_ID,
            HeaderValue::from_static("b7ad6b7169203331"),
        );
        app.oneshot(request).await.unwrap();

        let spans = spy.spans.lock().unwrap();
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].context.trace_id, TraceId(0x0af7651916cd43dd));
    }
}
