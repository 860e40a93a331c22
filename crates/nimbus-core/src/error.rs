use thiserror::Error;

/// Errors that can occur during Nimbus initialization and runtime.
#[derive(Debug, Error)]
pub enum NimbusError {
    #[error("WebGPU adapter not found: {0}")]
    AdapterNotFound(String),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequestFailed(String),

    #[error("Surface configuration failed: {0}")]
    SurfaceConfigFailed(String),

    #[error("Surface texture error: {0}")]
    SurfaceTextureError(String),

    #[error("Shader compilation failed: {0}")]
    ShaderCompilationFailed(String),

    #[error("DOM element missing: {0}")]
    DomElementMissing(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_message() {
        let err = NimbusError::SurfaceTextureError("Surface timed out".into());
        assert_eq!(err.to_string(), "Surface texture error: Surface timed out");
    }
}
