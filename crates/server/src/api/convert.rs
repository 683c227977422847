//! Conversion endpoints.
//!
//! Every endpoint accepts input through multipart fields (`file`, `base64`,
//! `url`); the gif endpoint additionally accepts a bare `url` as a query
//! parameter or a JSON body, which some long-standing callers still send.
//! Responses carry the transcoded payload base64-encoded under a key named
//! after the media kind, plus the output format tag and, for audio, the
//! recovered duration in whole seconds.

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

use forgeline_core::input::RawInput;
use forgeline_core::metrics::{
    CONVERSIONS_TOTAL, CONVERSION_DURATION, CONVERSION_FAILURES, INPUT_BYTES, OUTPUT_BYTES,
    REMOTE_FETCHES,
};
use forgeline_core::{ConversionRequest, OutputFormat, TranscodeError};

use crate::state::AppState;

/// Error payload returned for failed conversions.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub stage: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            body: ErrorBody {
                error: message.into(),
                stage: "acquisition",
                diagnostics: None,
            },
        }
    }
}

impl From<TranscodeError> for ApiError {
    fn from(err: TranscodeError) -> Self {
        CONVERSION_FAILURES.with_label_values(&[err.stage()]).inc();

        let status = match &err {
            TranscodeError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            _ if err.stage() == "acquisition" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        Self {
            status,
            body: ErrorBody {
                diagnostics: err.diagnostics().map(str::to_string),
                stage: err.stage(),
                error: err.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// The fields a conversion form can carry.
#[derive(Default)]
struct ConvertForm {
    input: RawInput,
    output_format: Option<String>,
    input_format: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ConvertForm, ApiError> {
    let mut form = ConvertForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        match name.as_str() {
            "file" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
                form.input.file = Some(bytes.to_vec());
            }
            "base64" => {
                form.input.base64 = Some(read_text(field).await?);
            }
            "url" => {
                form.input.url = Some(read_text(field).await?);
            }
            "output_format" => {
                form.output_format = Some(read_text(field).await?);
            }
            "input_format" => {
                form.input_format = Some(read_text(field).await?);
            }
            other => {
                warn!(field = other, "ignoring unknown form field");
            }
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ApiError> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read form field: {e}")))
}

fn source_label(input: &RawInput) -> &'static str {
    if input.file.is_some() {
        "upload"
    } else if input.base64.is_some() {
        "base64"
    } else {
        "url"
    }
}

/// Resolves the input, runs the conversion, and shapes the response body.
async fn run_conversion(
    state: &AppState,
    input: RawInput,
    input_format: String,
    output_format: OutputFormat,
    payload_key: &'static str,
) -> Result<Json<Value>, ApiError> {
    let source = source_label(&input);
    let from_url = input.url.is_some() && source == "url";

    let payload = match state.resolver().resolve(input).await {
        Ok(payload) => {
            if from_url {
                REMOTE_FETCHES.with_label_values(&["success"]).inc();
            }
            payload
        }
        Err(err) => {
            if from_url {
                REMOTE_FETCHES.with_label_values(&["error"]).inc();
            }
            return Err(err.into());
        }
    };
    INPUT_BYTES
        .with_label_values(&[source])
        .observe(payload.len() as f64);

    let tag = output_format.tag();
    let start = Instant::now();
    let output = state
        .transcoder()
        .convert(ConversionRequest {
            payload,
            input_format,
            output_format,
        })
        .await
        .inspect_err(|_| {
            CONVERSIONS_TOTAL.with_label_values(&[tag, "failed"]).inc();
        })?;

    CONVERSIONS_TOTAL.with_label_values(&[tag, "success"]).inc();
    CONVERSION_DURATION
        .with_label_values(&[tag])
        .observe(start.elapsed().as_secs_f64());
    OUTPUT_BYTES
        .with_label_values(&[tag])
        .observe(output.bytes.len() as f64);

    let mut body = serde_json::Map::new();
    body.insert(
        payload_key.to_string(),
        Value::String(BASE64.encode(&output.bytes)),
    );
    body.insert("format".to_string(), Value::String(tag.to_string()));
    if let Some(duration) = output.duration_secs {
        body.insert("duration".to_string(), Value::from(duration));
    }

    Ok(Json(Value::Object(body)))
}

/// `POST /convert/audio`: any supported audio output, default compact voice.
pub async fn convert_audio(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart).await?;
    let output_format = OutputFormat::parse_audio(form.output_format.as_deref().unwrap_or("ogg"));
    let input_format = form.input_format.unwrap_or_else(|| "ogg".to_string());
    run_conversion(&state, form.input, input_format, output_format, "audio").await
}

#[derive(Deserialize)]
struct UrlBody {
    url: Option<String>,
}

/// `POST /convert/gif`: animated GIF to H.264 MP4.
///
/// Input may arrive as multipart, as a `url` query parameter, or as a JSON
/// body with a `url` key.
pub async fn convert_gif(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    request: Request,
) -> Result<Json<Value>, ApiError> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    let input = if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?;
        read_form(multipart).await?.input
    } else if content_type.starts_with("application/json") {
        let Json(body): Json<UrlBody> = Json::from_request(request, &())
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed JSON body: {e}")))?;
        RawInput {
            url: body.url,
            ..Default::default()
        }
    } else {
        RawInput {
            url: params.get("url").cloned(),
            ..Default::default()
        }
    };

    run_conversion(&state, input, "gif".to_string(), OutputFormat::Mp4FromGif, "video").await
}

/// `POST /convert/video`: arbitrary video input to H.264 MP4.
pub async fn convert_video(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart).await?;
    let input_format = form.input_format.unwrap_or_else(|| "mp4".to_string());
    run_conversion(
        &state,
        form.input,
        input_format,
        OutputFormat::Mp4FromVideo,
        "video",
    )
    .await
}

/// `POST /convert/image`: still image normalized to a single-frame PNG.
pub async fn convert_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    let form = read_form(multipart).await?;
    let input_format = form.input_format.unwrap_or_else(|| "png".to_string());
    run_conversion(
        &state,
        form.input,
        input_format,
        OutputFormat::PngFromImage,
        "image",
    )
    .await
}
