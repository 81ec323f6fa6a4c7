use serde::Serialize;

/// Envelope for every JSON response under `/api`, except the agent-facing
/// notification poll which keeps its bare `{"notifications": [...]}` shape.
///
/// ```json
/// { "success": true, "data": { "system_id": 3 }, "message": "System registered" }
/// ```
///
/// Errors carry `T::default()` as `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Placeholder payload for error responses whose success type has no
/// sensible default.
#[derive(Debug, Default, Serialize)]
pub struct Empty {}
