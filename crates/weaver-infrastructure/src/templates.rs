//! Built-in starter templates.
//!
//! Read-only sessions available to everyone. Lookups return fresh copies
//! so callers never mutate the catalog.

use once_cell::sync::Lazy;
use weaver_core::session::Session;

static TEMPLATES: Lazy<Vec<Session>> = Lazy::new(|| {
    vec![
        template(
            "template_saas",
            "SaaS Landing Page",
            "https://images.unsplash.com/photo-1460925895917-afdab827c52f?auto=format&fit=crop&w=800&q=80",
            "<!DOCTYPE html><html><head><script src=\"https://cdn.tailwindcss.com\"></script></head><body class=\"bg-gray-50\"><div class=\"max-w-7xl mx-auto py-12 px-4 sm:px-6 lg:px-8\"><div class=\"text-center\"><h1 class=\"text-4xl font-extrabold text-gray-900 sm:text-5xl sm:tracking-tight lg:text-6xl\">Data to enrich your online business</h1><p class=\"mt-5 max-w-xl mx-auto text-xl text-gray-500\">Anim aute id magna aliqua ad ad non deserunt sunt. Qui irure qui lorem cupidatat commodo. Elit sunt amet fugiat veniam occaecat fugiat aliqua.</p></div></div></body></html>",
        ),
        template(
            "template_portfolio",
            "Designer Portfolio",
            "https://images.unsplash.com/photo-1507238691740-187a5b1d37b8?auto=format&fit=crop&w=800&q=80",
            "<!DOCTYPE html><html><head><script src=\"https://cdn.tailwindcss.com\"></script></head><body class=\"bg-white\"><nav class=\"flex items-center justify-between flex-wrap p-6\"><div class=\"flex items-center flex-shrink-0 text-black mr-6\"><span class=\"font-semibold text-xl tracking-tight\">Portfolio</span></div></nav><div class=\"container mx-auto px-4\"><div class=\"grid grid-cols-1 md:grid-cols-2 gap-8 mt-10\"><div class=\"bg-gray-100 h-64 rounded-lg\"></div><div class=\"bg-gray-100 h-64 rounded-lg\"></div></div></div></body></html>",
        ),
        template(
            "template_ecommerce",
            "E-commerce Store",
            "https://images.unsplash.com/photo-1441986300917-64674bd600d8?auto=format&fit=crop&w=800&q=80",
            "<!DOCTYPE html><html><head><script src=\"https://cdn.tailwindcss.com\"></script></head><body class=\"bg-white\"><header class=\"bg-white shadow\"><div class=\"max-w-7xl mx-auto py-6 px-4 sm:px-6 lg:px-8\"><h1 class=\"text-3xl font-bold text-gray-900\">Store</h1></div></header><main><div class=\"max-w-7xl mx-auto py-6 sm:px-6 lg:px-8\"><div class=\"px-4 py-6 sm:px-0\"><div class=\"border-4 border-dashed border-gray-200 rounded-lg h-96\"></div></div></div></main></body></html>",
        ),
    ]
});

fn template(id: &str, name: &str, thumbnail: &str, document: &str) -> Session {
    Session {
        id: id.to_string(),
        name: name.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        thumbnail: Some(thumbnail.to_string()),
        document: document.to_string(),
        history: Vec::new(),
        synced: true,
    }
}

/// All built-in templates.
pub fn all_templates() -> &'static [Session] {
    &TEMPLATES
}

/// Finds a template by id, returning a fresh copy.
pub fn template_by_id(id: &str) -> Option<Session> {
    TEMPLATES.iter().find(|t| t.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_contents() {
        assert_eq!(all_templates().len(), 3);
        for template in all_templates() {
            assert!(template.synced);
            assert!(template.thumbnail.is_some());
            assert!(template.document.starts_with("<!DOCTYPE html>"));
            assert!(template.history.is_empty());
        }
    }

    #[test]
    fn test_lookup_returns_copy() {
        let mut copy = template_by_id("template_saas").unwrap();
        copy.name = "mutated".to_string();
        assert_eq!(template_by_id("template_saas").unwrap().name, "SaaS Landing Page");
        assert!(template_by_id("unknown").is_none());
    }
}
