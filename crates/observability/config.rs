use std::env;

#[derive(Debug, Clone, PartialEq)]
pub struct ServiceContext {
    pub service_name: String,
    pub environment: String,
    pub component: String,
}

#[derive(Debug, Clone)]
pub(crate) struct ObservabilityConfig {
    pub(crate) service_context: ServiceContext,
    /// Collected while parsing so they can be logged once tracing is up.
    pub(crate) warnings: Vec<String>,
}

impl ObservabilityConfig {
    pub(crate) fn from_env(component: &str) -> Self {
        Self::from_values(
            component,
            env::var("SERVICE_NAME").ok(),
            env::var("STAGE").ok(),
        )
    }

    fn from_values(component: &str, service_name: Option<String>, stage: Option<String>) -> Self {
        let component = component.trim().to_string();
        let mut warnings = Vec::new();

        let service_name = service_name
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| component.clone());

        let environment = match stage.map(|v| v.trim().to_string()) {
            Some(stage) if !stage.is_empty() => stage,
            _ => {
                warnings.push("STAGE is not set; logging environment as `unknown`".to_string());
                "unknown".to_string()
            }
        };

        Self {
            service_context: ServiceContext {
                service_name,
                environment,
                component,
            },
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_name_falls_back_to_component() {
        let config = ObservabilityConfig::from_values(" backend ", Some("  ".to_string()), None);

        assert_eq!(config.service_context.service_name, "backend");
        assert_eq!(config.service_context.environment, "unknown");
        assert_eq!(config.warnings.len(), 1);
    }

    #[test]
    fn explicit_values_win() {
        let config = ObservabilityConfig::from_values(
            "backend",
            Some("luo-storefront".to_string()),
            Some("production".to_string()),
        );

        assert_eq!(config.service_context.service_name, "luo-storefront");
        assert_eq!(config.service_context.environment, "production");
        assert!(config.warnings.is_empty());
    }
}
