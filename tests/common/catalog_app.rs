// Fake update catalog shared between the integration tests and the catalog-stub binary
//
// Mirrors the parts of the real catalog the lookup reads: the results table
// on Search.aspx, the "no results" text, and the detail window opened by a
// result title.

use axum::{
    Router,
    extract::Query,
    response::Html,
    routing::get,
};
use serde::Deserialize;

/// An update the fake catalog knows about
pub struct StubUpdate {
    pub kb: &'static str,
    pub update_id: &'static str,
    pub title: &'static str,
    pub size: &'static str,
    pub description: &'static str,
}

pub const STUB_UPDATES: &[StubUpdate] = &[
    StubUpdate {
        kb: "5001716",
        update_id: "9f1c7a3e-2b1d-4c55-8d2e-5001716aaaaa",
        title: "2021-04 Update for Windows 10 Version 20H2 for x64-based Systems (KB5001716)",
        size: "24 MB",
        description: "Security update",
    },
    StubUpdate {
        kb: "4023057",
        update_id: "0b6a0f3c-1d2e-4f5a-9b8c-4023057bbbbb",
        title: "2021-03 Update for Windows 10 Version 1809 for x64-based Systems (KB4023057)",
        size: "3.1 MB",
        description: "This update includes reliability improvements to Windows Update Service components.",
    },
];

/// KB number whose results table is missing its size column
pub const STUB_BROKEN_KB: &str = "9999999";

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct DetailQuery {
    updateid: Option<String>,
}

pub async fn create_app() -> Router {
    Router::new()
        .route("/Search.aspx", get(search_page))
        .route("/ScopedViewInline.aspx", get(detail_page))
}

fn find_update(kb: &str) -> Option<&'static StubUpdate> {
    let kb = kb.trim().trim_start_matches("KB").trim_start_matches("kb");
    STUB_UPDATES.iter().find(|u| u.kb == kb)
}

const TABLE_HEADER: &str = r#"
        <tr class="resultsHeader">
            <td></td><td>Title</td><td>Products</td><td>Classification</td>
            <td>Last Updated</td><td>Version</td><td>Size</td><td></td>
        </tr>"#;

async fn search_page(Query(query): Query<SearchQuery>) -> Html<String> {
    let q = query.q.unwrap_or_default();

    let body = if q == STUB_BROKEN_KB {
        format!(
            r#"<table id="ctl00_catalogBody_updateMatches">{}
        <tr><td></td><td><a href="javascript:void(0)">Truncated row</a></td><td>Windows 10</td></tr>
    </table>"#,
            TABLE_HEADER
        )
    } else if let Some(update) = find_update(&q) {
        format!(
            r#"<table id="ctl00_catalogBody_updateMatches">{}
        <tr id="{id}_R0">
            <td><input type="button" value="Download"></td>
            <td><a id="{id}_link" href="javascript:void(0)"
                   onclick="window.open('/ScopedViewInline.aspx?updateid={id}', '_blank'); return false;">
                {title}
            </a></td>
            <td>Windows 10</td>
            <td>Updates</td>
            <td>4/13/2021</td>
            <td>n/a</td>
            <td><span id="{id}_size">   {size}   </span></td>
            <td></td>
        </tr>
    </table>"#,
            TABLE_HEADER,
            id = update.update_id,
            title = update.title,
            size = update.size,
        )
    } else {
        format!(
            r#"<span id="ctl00_catalogBody_noResultText">We did not find any results for "{}".</span>"#,
            q.replace('<', "&lt;")
        )
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Microsoft Update Catalog</title></head>
<body>
    <div id="catalogBody">{}</div>
</body>
</html>"#,
        body
    ))
}

async fn detail_page(Query(query): Query<DetailQuery>) -> Html<String> {
    let update_id = query.updateid.unwrap_or_default();
    let description = STUB_UPDATES
        .iter()
        .find(|u| u.update_id == update_id)
        .map(|u| u.description)
        .unwrap_or("");

    // The description is rendered after load, like the real detail view
    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Update Details</title></head>
<body>
    <div id="detailContainer"></div>
    <script>
        setTimeout(function () {{
            var desc = document.createElement('span');
            desc.id = 'ScopedViewHandler_desc';
            desc.textContent = '\n    {}\n  ';
            document.getElementById('detailContainer').appendChild(desc);
        }}, 400);
    </script>
</body>
</html>"#,
        description.replace('\'', "\\'")
    ))
}
