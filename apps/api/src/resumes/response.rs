use serde::Serialize;

/// Success envelope shared by every resume endpoint. Errors use the
/// `AppError` body, which carries `success: false`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            message: None,
            count: None,
            total: None,
            total_pages: None,
            current_page: None,
            data,
        }
    }

    pub fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn list(items: Vec<T>) -> Self {
        let count = items.len();
        ApiResponse {
            count: Some(count),
            ..ApiResponse::ok(items)
        }
    }

    pub fn paged(items: Vec<T>, total: u64, page: u32, limit: u32) -> Self {
        let limit = u64::from(limit.max(1));
        ApiResponse {
            total: Some(total),
            total_pages: Some(total.div_ceil(limit)),
            current_page: Some(page),
            ..ApiResponse::list(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn single_item_omits_list_metadata() {
        let body = serde_json::to_value(ApiResponse::ok(1).with_message("done")).unwrap();
        assert_eq!(body, json!({ "success": true, "message": "done", "data": 1 }));
    }

    #[test]
    fn paged_rounds_total_pages_up() {
        let body = serde_json::to_value(ApiResponse::paged(vec![1, 2], 21, 3, 10)).unwrap();
        assert_eq!(body["count"], json!(2));
        assert_eq!(body["total"], json!(21));
        assert_eq!(body["totalPages"], json!(3));
        assert_eq!(body["currentPage"], json!(3));
    }
}
