// Domain rules - Business logic and policies

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::errors::*;
use crate::domain::model::*;

/// `filename[^;=\n]*=((['"]).*?\2|[^;\n]*)` without the backreference:
/// a single- or double-quoted run, or an unquoted run up to `;` or newline.
static FILENAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"filename[^;=\n]*=('[^'\n]*'|"[^"\n]*"|[^;\n]*)"#)
        .expect("filename pattern is valid")
});

/// Local checks run before a trim request leaves the machine
pub struct RangeValidator;

impl RangeValidator {
    /// Reject ranges the backend would refuse anyway
    pub fn validate(start_time: f64, end_time: f64) -> Result<(), DomainError> {
        if !start_time.is_finite() || !end_time.is_finite() {
            return Err(DomainError::Validation(
                "Start and end time must be finite numbers".to_string(),
            ));
        }
        if start_time >= end_time {
            return Err(DomainError::Validation(
                "Start time must be less than end time".to_string(),
            ));
        }
        if start_time < 0.0 {
            return Err(DomainError::Validation(
                "Start time must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Decimal string form used for the `startTime`/`endTime` form fields
pub fn decimal_string(seconds: f64) -> String {
    seconds.to_string()
}

/// Pull the suggested filename out of a `Content-Disposition` value
pub fn filename_from_content_disposition(header: &str) -> Option<String> {
    let captures = FILENAME_PATTERN.captures(header)?;
    let raw = captures.get(1)?.as_str();
    Some(raw.replace(['\'', '"'], ""))
}

/// Decide what a non-success response body says went wrong
pub fn backend_error_message(body: &[u8]) -> String {
    let Ok(text) = std::str::from_utf8(body) else {
        return GENERIC_BACKEND_MESSAGE.to_string();
    };
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(value) => match value.get("detail").and_then(|d| d.as_str()) {
            Some(detail) if !detail.is_empty() => detail.to_string(),
            _ => GENERIC_BACKEND_MESSAGE.to_string(),
        },
        Err(_) => GENERIC_BACKEND_MESSAGE.to_string(),
    }
}

/// Turn a raw backend answer into a result or a `Backend` error
pub fn interpret_response(
    media: &SelectedMedia,
    response: TrimResponse,
) -> Result<TrimResult, DomainError> {
    if !response.is_success() {
        return Err(DomainError::Backend {
            status: response.status,
            message: backend_error_message(&response.body),
        });
    }

    let filename = response
        .content_disposition
        .as_deref()
        .and_then(filename_from_content_disposition)
        .unwrap_or_else(|| media.fallback_result_name());

    Ok(TrimResult {
        filename,
        content_type: response
            .content_type
            .unwrap_or_else(|| DEFAULT_RESULT_CONTENT_TYPE.to_string()),
        bytes: response.body,
    })
}

/// Reduce a suggested name to a bare file name that stays inside the download directory
pub fn sanitize_download_name(suggested: &str, fallback: &str) -> String {
    let candidate = suggested
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or("")
        .trim();
    if candidate.is_empty() || candidate == "." || candidate == ".." {
        fallback.to_string()
    } else {
        candidate.to_string()
    }
}

/// Browser-style alternative name: `clip.mp4` -> `clip (2).mp4`
pub fn numbered_name(name: &str, n: u32) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({}){}", &name[..dot], n, &name[dot..]),
        _ => format!("{} ({})", name, n),
    }
}

#[cfg(test)]
mod tests;
