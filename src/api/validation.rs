use super::ApiError;

pub fn validate_recipe_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid recipe ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_user_id(id: i32) -> Result<i32, ApiError> {
    if id <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid user ID: {}. ID must be a positive integer",
            id
        )));
    }
    Ok(id)
}

pub fn validate_page(page: u64) -> Result<u64, ApiError> {
    if page == 0 {
        return Err(ApiError::validation("page must be at least 1"));
    }
    Ok(page)
}

pub fn validate_time_limit(minutes: i32) -> Result<i32, ApiError> {
    if minutes <= 0 {
        return Err(ApiError::validation(format!(
            "Invalid time: {}. Time must be a positive number of minutes",
            minutes
        )));
    }
    Ok(minutes)
}
