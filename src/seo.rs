//! Crawler-facing outputs: robots.txt, sitemap.xml, llms.txt and feed.xml.
//!
//! Every generator here takes the *web* projection only. Redaction has already
//! happened, so nothing hidden from the site can leak into a crawler file.
//!
//! Outputs that need absolute URLs (sitemap, feed) come back empty when no
//! site URL is known; the dataset writer skips empty outputs.

use crate::blog::{BlogPost, BlogResult};
use crate::config::{SeoConfig, SiteConfig};
use crate::i18n::I18nBundle;
use crate::manifest;
use crate::profile::ResumeProfile;
use crate::visibility::Projection;
use chrono::NaiveDate;
use rss::{CategoryBuilder, ChannelBuilder, GuidBuilder, ItemBuilder};
use std::fmt::Write as _;

/// Most recent posts carried by the feed.
pub const FEED_ITEMS: usize = 20;

/// Title and description used in `<head>` when the site file has none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
}

/// `"Name (Location) - Tagline"`, leaving out whatever is missing.
pub fn derive_site_meta(resume: &ResumeProfile) -> SiteMeta {
    let mut title = resume.name.clone();
    let location = resume
        .contact
        .as_ref()
        .and_then(|c| c.location.as_ref())
        .map(ToString::to_string)
        .unwrap_or_default();
    if !location.is_empty() {
        title.push_str(&format!(" ({location})"));
    }
    if !resume.tagline.is_empty() {
        title.push_str(&format!(" - {}", resume.tagline));
    }
    SiteMeta {
        title,
        description: resume.tagline.clone(),
    }
}

/// Public base URL, without a trailing slash.
///
/// An explicit URL wins. Otherwise a GitHub `owner/repo` (as found in
/// `GITHUB_REPOSITORY`) maps to its Pages URL. Otherwise empty.
pub fn resolve_site_url(explicit: Option<&str>, github_repository: Option<&str>) -> String {
    if let Some(url) = explicit.filter(|u| !u.is_empty()) {
        return url.trim_end_matches('/').to_string();
    }
    if let Some((owner, repo)) = github_repository.and_then(|r| r.split_once('/'))
        && !owner.is_empty()
        && !repo.is_empty()
    {
        return format!("https://{owner}.github.io/{repo}");
    }
    String::new()
}

pub fn robots_txt(seo: &SeoConfig, site_url: &str) -> String {
    let mut out = String::from("User-agent: *\n");
    if !seo.robots.indexing {
        out.push_str("Disallow: /\n");
        return out;
    }
    out.push_str("Allow: /\n");
    if !site_url.is_empty() {
        let _ = writeln!(out, "Sitemap: {site_url}/sitemap.xml");
    }
    out
}

/// Content of the `<meta name="robots">` tag.
pub fn meta_robots(seo: &SeoConfig) -> &'static str {
    match (seo.robots.indexing, seo.robots.follow_links) {
        (false, _) => "noindex, nofollow",
        (true, true) => "index, follow",
        (true, false) => "index, nofollow",
    }
}

/// One `<url>` per manifest route, plus one per published post.
pub fn sitemap_xml(
    routes: &[String],
    site_url: &str,
    build_date: NaiveDate,
    i18n: &I18nBundle,
    posts: &[BlogPost],
) -> String {
    if site_url.is_empty() {
        return String::new();
    }
    let main_routes = [
        format!("/{}", manifest::skills_segment(i18n)),
        format!("/{}", manifest::projects_segment(i18n)),
        format!("/{}", manifest::blog_segment(i18n)),
    ];

    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for route in routes {
        let priority = if route == "/" {
            "1.0"
        } else if main_routes.contains(route) {
            "0.8"
        } else {
            "0.6"
        };
        push_url(&mut xml, &format!("{site_url}{route}"), build_date, priority);
    }
    let blog = manifest::blog_segment(i18n);
    for post in posts {
        let loc = format!("{site_url}/{blog}/{}", post.slug);
        push_url(&mut xml, &loc, post.publish_on.unwrap_or(build_date), "0.6");
    }
    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, lastmod: NaiveDate, priority: &str) {
    let _ = write!(
        xml,
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <priority>{priority}</priority>\n  </url>\n",
        escape_xml(loc)
    );
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Plain-Markdown summary of the web projection for language models.
pub fn llms_txt(web: &Projection) -> String {
    let resume = &web.resume;
    let mut lines: Vec<String> = Vec::new();

    if resume.tagline.is_empty() {
        lines.push(format!("# {}", resume.name));
    } else {
        lines.push(format!("# {} - {}", resume.name, resume.tagline));
    }
    lines.push(String::new());

    if let Some(summary) = resume.summary.as_deref().filter(|s| !s.trim().is_empty()) {
        lines.push(format!("> {}", summary.trim().replace('\n', "\n> ")));
        lines.push(String::new());
    }

    if let Some(contact) = &resume.contact {
        let mut fields = Vec::new();
        if let Some(location) = &contact.location {
            fields.push(format!("- Location: {location}"));
        }
        if let Some(website) = &contact.website {
            fields.push(format!("- Website: {website}"));
        }
        if let Some(email) = &contact.email {
            fields.push(format!("- Email: {email}"));
        }
        if let Some(phone) = &contact.phone {
            fields.push(format!("- Phone: {phone}"));
        }
        for social in contact.socials.iter().flatten() {
            let kind = social.kind.as_deref().unwrap_or("Social");
            let handle = social.username.as_deref().or(social.url.as_deref()).unwrap_or_default();
            fields.push(format!("- {kind}: {handle}"));
        }
        for link in contact.links.iter().flatten() {
            let title = link.title.as_deref().unwrap_or("Link");
            fields.push(format!("- {title}: {}", link.url.as_deref().unwrap_or_default()));
        }
        if !fields.is_empty() {
            lines.push("## Contact".to_string());
            lines.extend(fields);
            lines.push(String::new());
        }
    }

    if let Some(entries) = resume.experience.as_ref().filter(|e| !e.is_empty()) {
        lines.push("## Experience".to_string());
        for exp in entries {
            let at = exp
                .company
                .as_deref()
                .map(|c| format!(" at {c}"))
                .unwrap_or_default();
            let heading = match (exp.title.as_deref(), exp.company.as_deref()) {
                (Some(title), _) => format!("{title}{at}"),
                (None, Some(company)) => company.to_string(),
                (None, None) => "Role".to_string(),
            };
            lines.push(format!(
                "### {heading} ({})",
                span(exp.start.as_deref(), exp.end.as_deref(), "Present")
            ));
            push_text(&mut lines, exp.description.as_deref());
            if !exp.skills.is_empty() {
                lines.push(format!("Skills: {}", exp.skills.join(", ")));
            }
            lines.push(String::new());
        }
    }

    if let Some(projects) = web.projects.as_ref().filter(|p| !p.projects.is_empty()) {
        lines.push("## Projects".to_string());
        for project in &projects.projects {
            lines.push(format!(
                "### {} ({})",
                project.name,
                span(Some(project.start.as_str()), project.end.as_deref(), "Ongoing")
            ));
            push_text(&mut lines, Some(project.description.as_str()));
            if let Some(url) = &project.url {
                lines.push(format!("URL: {url}"));
            }
            if let Some(repo) = &project.repo {
                lines.push(format!("Repo: {repo}"));
            }
            if !project.skills.is_empty() {
                lines.push(format!("Skills: {}", project.skills.join(", ")));
            }
            lines.push(String::new());
        }
    }

    if let Some(entries) = resume.education.as_ref().filter(|e| !e.is_empty()) {
        lines.push("## Education".to_string());
        for edu in entries {
            let heading = [edu.qualification.as_deref(), edu.institution.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!(
                "### {heading} ({})",
                span(edu.start.as_deref(), edu.end.as_deref(), "Present")
            ));
            push_text(&mut lines, edu.description.as_deref());
            lines.push(String::new());
        }
    }

    if let Some(skills) = web.skills.as_ref().filter(|s| !s.is_empty()) {
        lines.push("## Skills".to_string());
        for category in &skills.categories {
            if let Some(name) = &category.name {
                lines.push(format!("### {name}"));
            }
            for skill in &category.skills {
                let mut parts = vec![skill.name.clone()];
                if let Some(level) = &skill.level {
                    parts.push(format!("Level: {level}"));
                }
                if let Some(years) = skill.extra.get("years_active").filter(|v| !v.is_null()) {
                    let years = years.as_str().map(str::to_string).unwrap_or_else(|| years.to_string());
                    parts.push(format!("{years} years"));
                }
                lines.push(format!("- {}", parts.join(", ")));
            }
            lines.push(String::new());
        }
    }

    if let Some(entries) = resume.community.as_ref().filter(|e| !e.is_empty()) {
        lines.push("## Community".to_string());
        for entry in entries {
            let heading = [entry.name.as_deref(), entry.role.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(", ");
            lines.push(format!("### {heading}"));
            push_text(&mut lines, entry.description.as_deref());
            lines.push(String::new());
        }
    }

    if let Some(entries) = resume.accreditations.as_ref().filter(|e| !e.is_empty()) {
        lines.push("## Accreditations".to_string());
        for entry in entries {
            let mut parts: Vec<String> = [entry.title.as_deref(), entry.issuer.as_deref()]
                .into_iter()
                .flatten()
                .map(str::to_string)
                .collect();
            if let Some(date) = &entry.date {
                parts.push(format!("({date})"));
            }
            lines.push(format!("- {}", parts.join(", ")));
        }
        lines.push(String::new());
    }

    let posts = web.blog.posts();
    if !posts.is_empty() {
        lines.push("## Blog".to_string());
        for post in posts {
            lines.push(format!("### {}", post.title));
            if let Some(date) = post.publish_on {
                lines.push(format!("Published: {date}"));
            }
            push_text(&mut lines, Some(post.description.as_str()));
            if !post.tags.is_empty() {
                lines.push(format!("Tags: {}", post.tags.join(", ")));
            }
            lines.push(String::new());
        }
    }

    lines.join("\n")
}

fn span(start: Option<&str>, end: Option<&str>, open: &str) -> String {
    let end = end.filter(|e| !e.is_empty()).unwrap_or(open);
    match start.filter(|s| !s.is_empty()) {
        Some(start) => format!("{start} - {end}"),
        None => end.to_string(),
    }
}

fn push_text(lines: &mut Vec<String>, text: Option<&str>) {
    if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
        lines.push(text.to_string());
    }
}

/// RSS 2.0 feed of the newest posts. Empty without posts or a site URL.
///
/// Channel title and description come from the site configuration, which the
/// pipeline has already completed from the résumé.
pub fn feed_xml(site: &SiteConfig, blog: &BlogResult, site_url: &str, i18n: &I18nBundle) -> String {
    let posts = blog.posts();
    if posts.is_empty() || site_url.is_empty() {
        return String::new();
    }
    let blog_segment = manifest::blog_segment(i18n);

    let items: Vec<rss::Item> = posts
        .iter()
        .take(FEED_ITEMS)
        .map(|post| {
            let link = format!("{site_url}/{blog_segment}/{}", post.slug);
            let categories = post
                .tags
                .iter()
                .map(|tag| CategoryBuilder::default().name(tag.clone()).build())
                .collect::<Vec<_>>();
            ItemBuilder::default()
                .title(Some(post.title.clone()))
                .link(Some(link.clone()))
                .description(Some(post.description.clone()))
                .author(Some(post.author.clone()).filter(|a| !a.is_empty()))
                .pub_date(post.publish_on.and_then(rfc2822))
                .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
                .categories(categories)
                .build()
        })
        .collect();

    let channel = ChannelBuilder::default()
        .title(site.title.clone().unwrap_or_default())
        .link(format!("{site_url}/"))
        .description(site.description.clone().unwrap_or_default())
        .language(Some(site.lang.clone()))
        .items(items)
        .build();
    channel.to_string()
}

fn rfc2822(date: NaiveDate) -> Option<String> {
    date.and_hms_opt(0, 0, 0).map(|d| d.and_utc().to_rfc2822())
}
