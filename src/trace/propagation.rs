//! Cross-service context propagation codecs.
//!
//! Two header formats are supported:
//! - B3 multi-header (`x-b3-traceid`, `x-b3-spanid`, `x-b3-sampled`), the
//!   default format.
//! - AWS X-Ray (`x-amzn-trace-id: Root=1-{epoch}-{unique};Parent=..;Sampled=..`),
//!   the alternate format used by the `/tracedaws` variant.
//!
//! Only the fields the harness needs are encoded; vendor extensions and
//! multi-tenant baggage are out of scope.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::trace::policy::Propagation;
use crate::trace::span::{SpanId, TraceContext, TraceId};

pub const B3_TRACE_ID: HeaderName = HeaderName::from_static("x-b3-traceid");
pub const B3_SPAN_ID: HeaderName = HeaderName::from_static("x-b3-spanid");
pub const B3_SAMPLED: HeaderName = HeaderName::from_static("x-b3-sampled");
pub const AWS_TRACE_HEADER: HeaderName = HeaderName::from_static("x-amzn-trace-id");

/// Context pulled from incoming request headers. The sampling flag is
/// optional: an upstream may send ids without a decision, in which case the
/// receiving sampler decides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extracted {
    pub trace_id: TraceId,
    pub span_id: SpanId,
    pub sampled: Option<bool>,
}

/// Write `ctx` into `headers` using the given format.
pub fn inject(format: Propagation, ctx: &TraceContext, headers: &mut HeaderMap) {
    match format {
        Propagation::B3 => {
            set(headers, B3_TRACE_ID, &ctx.trace_id.to_string());
            set(headers, B3_SPAN_ID, &ctx.span_id.to_string());
            set(headers, B3_SAMPLED, if ctx.sampled { "1" } else { "0" });
        }
        Propagation::Aws => {
            let hex = format!("{:032x}", ctx.trace_id.0);
            let value = format!(
                "Root=1-{}-{};Parent={};Sampled={}",
                &hex[..8],
                &hex[8..],
                ctx.span_id,
                if ctx.sampled { "1" } else { "0" },
            );
            set(headers, AWS_TRACE_HEADER, &value);
        }
    }
}

/// Read a context out of `headers` using the given format. Returns `None`
/// when the headers are absent or malformed; the caller then starts a new
/// root trace.
pub fn extract(format: Propagation, headers: &HeaderMap) -> Option<Extracted> {
    match format {
        Propagation::B3 => {
            let trace_id = TraceId::parse_hex(get(headers, &B3_TRACE_ID)?)?;
            let span_id = SpanId::parse_hex(get(headers, &B3_SPAN_ID)?)?;
            let sampled = get(headers, &B3_SAMPLED).and_then(parse_flag);
            Some(Extracted {
                trace_id,
                span_id,
                sampled,
            })
        }
        Propagation::Aws => extract_aws(get(headers, &AWS_TRACE_HEADER)?),
    }
}

fn extract_aws(value: &str) -> Option<Extracted> {
    let mut root = None;
    let mut parent = None;
    let mut sampled = None;
    for field in value.split(';') {
        let (key, val) = field.trim().split_once('=')?;
        match key {
            "Root" => {
                // Root=1-{8 hex}-{24 hex}; the dashes are cosmetic.
                let rest = val.strip_prefix("1-")?;
                let (epoch, unique) = rest.split_once('-')?;
                if epoch.len() != 8 || unique.len() != 24 {
                    return None;
                }
                let mut hex = String::with_capacity(32);
                hex.push_str(epoch);
                hex.push_str(unique);
                root = Some(TraceId::parse_hex(&hex)?);
            }
            "Parent" => parent = Some(SpanId::parse_hex(val)?),
            "Sampled" => sampled = parse_flag(val),
            _ => {}
        }
    }
    Some(Extracted {
        trace_id: root?,
        span_id: parent?,
        sampled,
    })
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "1" => Some(true),
        "0" => Some(false),
        _ => None,
    }
}

fn get<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name)?.to_str().ok()
}

fn set(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}
