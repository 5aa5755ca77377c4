//! HTML host page for the grid widget
//!
//! The page fetches `/api/v1/grid` and turns the declarative column settings
//! (style rules, editors, image renderer) into AG Grid callbacks.

const GRID_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<script src="https://cdn.jsdelivr.net/npm/ag-grid-community@31.3.2/dist/ag-grid-community.min.js"></script>
<style>
  body { font-family: Arial, sans-serif; margin: 16px; }
  #error { color: #b00020; font-weight: bold; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<div id="error"></div>
<div id="grid"></div>
<script>
function styleRule(rule) {
  switch (rule.kind) {
    case 'fixed':
      return () => rule.style;
    case 'greaterThan':
      return (p) => (parseFloat(p.value) > rule.threshold ? rule.matched : rule.base);
    case 'equalsInteger':
      return (p) => (parseInt(p.value) === rule.value ? rule.matched : rule.base);
    default:
      return undefined;
  }
}

function imageRenderer(height) {
  return (p) => {
    if (!p.value) return '';
    const img = document.createElement('img');
    img.src = p.value;
    img.style.height = height + 'px';
    img.style.objectFit = 'contain';
    return img;
  };
}

function columnDef(def) {
  const col = Object.assign({}, def);
  if (def.cellStyle) col.cellStyle = styleRule(def.cellStyle);
  if (def.cellEditor) {
    if (def.cellEditor.type === 'select') {
      col.cellEditor = 'agSelectCellEditor';
      col.cellEditorParams = { values: def.cellEditor.values };
    } else {
      col.cellEditor = 'agTextCellEditor';
    }
  }
  if (def.cellRenderer && def.cellRenderer.type === 'image') {
    col.cellRenderer = imageRenderer(def.cellRenderer.height);
  }
  return col;
}

function headerCss(customCss) {
  return Object.entries(customCss)
    .map(([selector, decls]) =>
      selector + ' { ' + Object.entries(decls).map(([k, v]) => k + ': ' + v).join('; ') + ' }')
    .join('\n');
}

fetch('api/v1/grid')
  .then((r) => r.json())
  .then((resp) => {
    if (!resp.success) {
      document.getElementById('error').textContent = resp.error;
      return;
    }
    const payload = resp.data;
    const render = payload.renderOptions;
    const el = document.getElementById('grid');
    el.className = 'ag-theme-' + render.theme;
    el.style.height = render.height + 'px';

    const style = document.createElement('style');
    style.textContent = headerCss(render.customCss);
    document.head.appendChild(style);

    const options = Object.assign({}, payload.gridOptions, {
      columnDefs: payload.gridOptions.columnDefs.map(columnDef),
      rowData: payload.rowData,
    });
    if (render.fitColumnsOnGridLoad) {
      options.onFirstDataRendered = (e) => e.api.sizeColumnsToFit();
    }
    agGrid.createGrid(el, options);
  })
  .catch((err) => {
    document.getElementById('error').textContent = String(err);
  });
</script>
</body>
</html>
"#;

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{TITLE}}</title>
<style>
  body { font-family: Arial, sans-serif; margin: 16px; }
  .error { color: #b00020; font-weight: bold; }
</style>
</head>
<body>
<h1>{{TITLE}}</h1>
<p class="error">&#10060; {{MESSAGE}}</p>
</body>
</html>
"#;

/// Page that loads and renders the grid
pub fn grid_page(title: &str) -> String {
    GRID_PAGE.replace("{{TITLE}}", &escape_html(title))
}

/// Page with only an error message; no grid is created
pub fn error_page(title: &str, message: &str) -> String {
    ERROR_PAGE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{MESSAGE}}", &escape_html(message))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
