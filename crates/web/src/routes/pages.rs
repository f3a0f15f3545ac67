//! Public informational pages.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::filters;
use crate::middleware::PageContext;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/index.html")]
pub struct IndexTemplate {
    pub ctx: PageContext,
}

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/service.html")]
pub struct ServiceTemplate {
    pub ctx: PageContext,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about_us.html")]
pub struct AboutUsTemplate {
    pub ctx: PageContext,
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub ctx: PageContext,
}

/// Display the home page.
#[instrument(skip_all)]
pub async fn index(ctx: PageContext) -> IndexTemplate {
    IndexTemplate { ctx }
}

/// Display the services page.
#[instrument(skip_all)]
pub async fn service(ctx: PageContext) -> ServiceTemplate {
    ServiceTemplate { ctx }
}

/// Display the about page.
#[instrument(skip_all)]
pub async fn about_us(ctx: PageContext) -> AboutUsTemplate {
    AboutUsTemplate { ctx }
}

/// Display the contact page.
#[instrument(skip_all)]
pub async fn contact(ctx: PageContext) -> ContactTemplate {
    ContactTemplate { ctx }
}
