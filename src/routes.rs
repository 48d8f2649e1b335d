//! Hash-route table of the front end.
//!
//! Paths map to named page components or to redirect handlers. Matching
//! follows react-router v5 semantics: `:param` segments, case-insensitive
//! literals, `exact` and `strict` flags, first match wins.

use anyhow::{bail, Result};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Redirect hops followed by [`RouteTable::navigate`] before giving up.
pub const MAX_REDIRECTS: usize = 8;

/// Page components rendered by the shell. Their internals live elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Page {
    Swap,
    PoolFinder,
    Pool,
    AddLiquidity,
    RemoveLiquidity,
}

/// Component a route entry mounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RouteComponent {
    Page(Page),
    /// `/add/:currencyIdA`, including the old `0xA-0xB` pair form
    RedirectOldAddLiquidityPathStructure,
    /// `/add/:currencyIdA/:currencyIdB` with the same token twice
    RedirectDuplicateTokenIds,
    /// `/remove/:tokens` in the old `0xA-0xB` pair form
    RedirectOldRemoveLiquidityPathStructure,
    RedirectPathToSwapOnly,
}

/// A parsed hash location: path plus optional query string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub path: String,
    pub query: Option<String>,
}

impl Location {
    /// Parse a hash fragment (`#/add/0xA?x=1`), a URL carrying one, or a
    /// bare path. An empty path is `/`.
    pub fn parse(input: &str) -> Self {
        let route = match input.find('#') {
            Some(idx) => &input[idx + 1..],
            None => input,
        };

        let (path, query) = match route.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (route, None),
        };

        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        Self {
            path,
            query: query.filter(|q| !q.is_empty()),
        }
    }

    /// Query string with its leading `?`, or empty.
    pub fn search(&self) -> String {
        match &self.query {
            Some(query) => format!("?{}", query),
            None => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    Param(&'static str),
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct Route {
    /// `None` matches every location
    pub pattern: Option<&'static str>,
    pub component: RouteComponent,
    pub exact: bool,
    pub strict: bool,
    segments: Vec<Segment>,
}

impl Route {
    fn new(pattern: &'static str, component: RouteComponent, exact: bool, strict: bool) -> Self {
        let segments = pattern
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name),
                None => Segment::Literal(s),
            })
            .collect();

        Self {
            pattern: Some(pattern),
            component,
            exact,
            strict,
            segments,
        }
    }

    fn fallback(component: RouteComponent) -> Self {
        Self {
            pattern: None,
            component,
            exact: false,
            strict: false,
            segments: Vec::new(),
        }
    }

    /// Match `path` against this entry, returning the captured params.
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        if self.pattern.is_none() {
            return Some(BTreeMap::new());
        }

        let has_trailing_slash = path.len() > 1 && path.ends_with('/');
        let body = if has_trailing_slash {
            &path[..path.len() - 1]
        } else {
            path
        };

        let parts: Vec<&str> = match body.strip_prefix('/').unwrap_or(body) {
            "" => Vec::new(),
            rest => rest.split('/').collect(),
        };

        if parts.len() < self.segments.len() {
            return None;
        }
        if self.exact && parts.len() != self.segments.len() {
            return None;
        }
        // strict only cares about the trailing slash when the match must end there
        if self.exact && self.strict && has_trailing_slash {
            return None;
        }

        let mut params = BTreeMap::new();
        for (segment, part) in self.segments.iter().zip(&parts) {
            match segment {
                Segment::Literal(literal) => {
                    if !literal.eq_ignore_ascii_case(part) {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    if part.is_empty() {
                        return None;
                    }
                    params.insert(name.to_string(), part.to_string());
                }
            }
        }

        Some(params)
    }
}

/// What the shell does for a location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RouteAction {
    Render {
        page: Page,
        params: BTreeMap<String, String>,
    },
    Redirect {
        to: String,
    },
}

/// Result of resolving one location against the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub location: Location,
    pub pattern: Option<&'static str>,
    pub component: RouteComponent,
    pub params: BTreeMap<String, String>,
    pub action: RouteAction,
}

/// Ordered route table; the first matching entry wins.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            routes: vec![
                Route::new("/swap", RouteComponent::Page(Page::Swap), true, true),
                Route::new("/find", RouteComponent::Page(Page::PoolFinder), true, true),
                Route::new("/pool", RouteComponent::Page(Page::Pool), true, true),
                Route::new("/add", RouteComponent::Page(Page::AddLiquidity), true, false),
                Route::new(
                    "/remove/:currencyIdA/:currencyIdB",
                    RouteComponent::Page(Page::RemoveLiquidity),
                    true,
                    true,
                ),
                // Old link shapes still produced around the app
                Route::new(
                    "/add/:currencyIdA",
                    RouteComponent::RedirectOldAddLiquidityPathStructure,
                    true,
                    false,
                ),
                Route::new(
                    "/add/:currencyIdA/:currencyIdB",
                    RouteComponent::RedirectDuplicateTokenIds,
                    true,
                    false,
                ),
                Route::new(
                    "/remove/:tokens",
                    RouteComponent::RedirectOldRemoveLiquidityPathStructure,
                    true,
                    true,
                ),
                Route::fallback(RouteComponent::RedirectPathToSwapOnly),
            ],
        }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Resolve a single location without following redirects.
    pub fn resolve(&self, location: &Location) -> Resolution {
        let matched = self
            .routes
            .iter()
            .find_map(|route| route.matches(&location.path).map(|params| (route, params)));

        let (pattern, component, params) = match matched {
            Some((route, params)) => (route.pattern, route.component, params),
            None => (None, RouteComponent::RedirectPathToSwapOnly, BTreeMap::new()),
        };

        let action = handle(component, &params, location);

        Resolution {
            location: location.clone(),
            pattern,
            component,
            params,
            action,
        }
    }

    /// Resolve a location and follow redirects until a page renders.
    ///
    /// Returns every hop, the rendering one last.
    pub fn navigate(&self, location: &Location) -> Result<Vec<Resolution>> {
        let mut hops = Vec::new();
        let mut current = location.clone();

        loop {
            let resolution = self.resolve(&current);
            let next = match &resolution.action {
                RouteAction::Render { .. } => None,
                RouteAction::Redirect { to } => Some(Location::parse(to)),
            };
            hops.push(resolution);

            match next {
                None => return Ok(hops),
                Some(_) if hops.len() > MAX_REDIRECTS => {
                    bail!(
                        "Too many redirects resolving {} (stopped after {})",
                        location.path,
                        MAX_REDIRECTS
                    )
                }
                Some(next) => current = next,
            }
        }
    }
}

/// `0x<40 hex>-0x<40 hex>`, the pair form of the old liquidity URLs.
fn old_path_structure() -> &'static Regex {
    static OLD_PATH_STRUCTURE: OnceLock<Regex> = OnceLock::new();
    OLD_PATH_STRUCTURE.get_or_init(|| {
        Regex::new(r"^(0x[a-fA-F0-9]{40})-(0x[a-fA-F0-9]{40})$").expect("valid pair regex")
    })
}

fn param<'a>(params: &'a BTreeMap<String, String>, name: &str) -> &'a str {
    params.get(name).map(String::as_str).unwrap_or_default()
}

fn render(page: Page, params: &BTreeMap<String, String>) -> RouteAction {
    RouteAction::Render {
        page,
        params: params.clone(),
    }
}

fn redirect(to: String) -> RouteAction {
    RouteAction::Redirect { to }
}

fn handle(
    component: RouteComponent,
    params: &BTreeMap<String, String>,
    location: &Location,
) -> RouteAction {
    match component {
        RouteComponent::Page(page) => render(page, params),

        RouteComponent::RedirectOldAddLiquidityPathStructure => {
            let currency_id_a = param(params, "currencyIdA");
            match old_path_structure().captures(currency_id_a) {
                Some(pair) => redirect(format!("/add/{}/{}", &pair[1], &pair[2])),
                None => render(Page::AddLiquidity, params),
            }
        }

        RouteComponent::RedirectDuplicateTokenIds => {
            let currency_id_a = param(params, "currencyIdA");
            let currency_id_b = param(params, "currencyIdB");
            if currency_id_a.to_lowercase() == currency_id_b.to_lowercase() {
                redirect(format!("/add/{}", currency_id_a))
            } else {
                render(Page::AddLiquidity, params)
            }
        }

        RouteComponent::RedirectOldRemoveLiquidityPathStructure => {
            let tokens = param(params, "tokens");
            match old_path_structure().captures(tokens) {
                Some(pair) => redirect(format!("/remove/{}/{}", &pair[1], &pair[2])),
                None => redirect("/pool".to_string()),
            }
        }

        RouteComponent::RedirectPathToSwapOnly => redirect(format!("/swap{}", location.search())),
    }
}
