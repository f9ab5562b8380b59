//! Placeholder substitution for query fragments.
//!
//! Custom filters are applied first, then the delivery-context placeholders.
//! Unknown placeholders are left verbatim.

use dynatrace_config::{DeliveryContext, SliFilter};

/// Substitutes `$PLACEHOLDER` tokens from custom filters and the delivery context.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderResolver {
    context: DeliveryContext,
    custom_filters: Vec<SliFilter>,
}

impl PlaceholderResolver {
    pub fn new(context: DeliveryContext, custom_filters: Vec<SliFilter>) -> Self {
        Self {
            context,
            custom_filters,
        }
    }

    pub fn context(&self) -> &DeliveryContext {
        &self.context
    }

    /// Replace every known placeholder in `query`.
    pub fn apply(&self, query: &str) -> String {
        let mut query = query.to_string();

        for filter in &self.custom_filters {
            let value = filter.value.replace(['\'', '"'], "");
            query = query.replace(&format!("${}", filter.key), &value);
            query = query.replace(&format!("${}", filter.key.to_uppercase()), &value);
        }

        let ctx = &self.context;
        let fields = [
            ("$CONTEXT", &ctx.keptn_context),
            ("$EVENT", &ctx.event),
            ("$SOURCE", &ctx.source),
            ("$PROJECT", &ctx.project),
            ("$STAGE", &ctx.stage),
            ("$SERVICE", &ctx.service),
            ("$DEPLOYMENT", &ctx.deployment),
            ("$TESTSTRATEGY", &ctx.test_strategy),
        ];
        for (placeholder, value) in fields {
            query = query.replace(placeholder, value);
        }

        for (key, value) in &ctx.labels {
            query = query.replace(&format!("$LABEL.{}", key), value);
        }

        query
    }
}
