//! Request matching table built from route descriptors

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    body::Bytes,
    extract::Path,
    http::{HeaderMap, Method},
    routing::{MethodFilter, MethodRouter},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use super::{
    dispatch::{dispatch, panic_response},
    Route, RouteRequest,
};

/// Build the router for a closed set of routes.
///
/// Static segments win over captures when patterns overlap. Beyond that the
/// first registered route wins: a later route claiming an already taken
/// (pattern, method) pair, or a pattern differing only in capture names, is
/// skipped with a warning.
pub fn build_router(routes: Vec<Arc<dyn Route>>) -> Router {
    let mut table: Vec<(String, MethodRouter)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut taken: HashSet<(String, Method)> = HashSet::new();

    for route in routes {
        let pattern = matcher_path(route.path());
        let shape = pattern_shape(&pattern);

        let slot = match index.get(&shape) {
            Some(&i) if table[i].0 != pattern => {
                tracing::warn!(
                    path = route.path(),
                    existing = %table[i].0,
                    "Skipping route shadowed by an earlier pattern"
                );
                continue;
            }
            Some(&i) => i,
            None => {
                table.push((pattern.clone(), MethodRouter::new()));
                index.insert(shape.clone(), table.len() - 1);
                table.len() - 1
            }
        };

        for method in route.methods() {
            if !taken.insert((shape.clone(), method.clone())) {
                tracing::warn!(path = route.path(), %method, "Skipping duplicate route");
                continue;
            }
            let filter = match MethodFilter::try_from(method.clone()) {
                Ok(filter) => filter,
                Err(_) => {
                    tracing::warn!(path = route.path(), %method, "Skipping unsupported method");
                    continue;
                }
            };

            let route = Arc::clone(&route);
            let handler = move |params: Option<Path<HashMap<String, String>>>,
                                method: Method,
                                headers: HeaderMap,
                                body: Bytes| async move {
                let req = RouteRequest {
                    method,
                    params: params.map(|Path(p)| p).unwrap_or_default(),
                    headers,
                    body,
                };
                dispatch(route, req).await
            };

            let (path, methods) = &mut table[slot];
            *methods = std::mem::replace(methods, MethodRouter::new()).on(filter, handler);
            tracing::debug!(path = %path, %method, "Registered route");
        }
    }

    table
        .into_iter()
        .fold(Router::new(), |router, (path, methods)| {
            router.route(&path, methods)
        })
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(TraceLayer::new_for_http())
}

/// Translate `{name}` / `{*name}` segments into the matcher's syntax
fn matcher_path(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => match name.strip_prefix('*') {
                Some(rest) => format!("*{}", rest),
                None => format!(":{}", name),
            },
            None => segment.to_string(),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Pattern with capture names erased, used to detect structural duplicates
fn pattern_shape(pattern: &str) -> String {
    pattern
        .split('/')
        .map(|segment| match segment.chars().next() {
            Some(':') => ":",
            Some('*') => "*",
            _ => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}
