use crate::models::{CellRef, Day, NutrientCategory, NutrientData, TrackerSnapshot};
use crate::tone::classify;
use std::fmt::Write;

pub fn render_index(snapshot: &TrackerSnapshot, today: Day) -> String {
    INDEX_HTML
        .replace("{{HEAD}}", HEAD_HTML)
        .replace("{{DAYS}}", &render_day_headers(today))
        .replace("{{ROWS}}", &render_rows(snapshot))
}

/// Shown until hydration finishes, so defaults never flash on screen.
pub fn render_skeleton() -> String {
    let mut rows = String::new();
    for _ in NutrientCategory::ALL {
        rows.push_str("<tr><td></td><td><span class=\"bone wide\"></span></td><td><span class=\"bone\"></span></td>");
        for _ in Day::ALL {
            rows.push_str("<td><span class=\"bone cell\"></span></td>");
        }
        rows.push_str("</tr>");
    }
    SKELETON_HTML
        .replace("{{HEAD}}", HEAD_HTML)
        .replace("{{ROWS}}", &rows)
}

fn render_day_headers(today: Day) -> String {
    let mut out = String::new();
    for day in Day::ALL {
        let class = if day == today { " class=\"today\"" } else { "" };
        let _ = write!(out, "<th{class}>{}</th>", day.label());
    }
    out
}

pub fn render_rows(snapshot: &TrackerSnapshot) -> String {
    let mut out = String::new();
    for (index, category) in snapshot.order.as_slice().iter().copied().enumerate() {
        render_row(&mut out, index, category, snapshot);
    }
    out
}

fn render_row(out: &mut String, index: usize, category: NutrientCategory, snapshot: &TrackerSnapshot) {
    let data: &NutrientData = snapshot.data.get(category);
    let label = category.label();
    let _ = write!(
        out,
        r#"<tr draggable="true" data-index="{index}" data-category="{label}">
  <td class="handle" title="Arrastrar para reordenar">⋮⋮</td>
  <td class="name"><span class="icon">{icon}</span>{name}</td>
  <td>
    <form class="max-form" method="post" action="/max">
      <input type="hidden" name="category" value="{label}" />
      <input type="number" name="value" min="0" value="{max}" aria-label="Max portions for {label}" />
    </form>
  </td>
"#,
        icon = icon(category),
        name = category.display_name(),
        max = data.max_portions,
    );

    for day in Day::ALL {
        let count = data.portions.get(day);
        let mut classes = vec!["portion"];
        if let Some(tone) = classify(count, data.max_portions) {
            classes.push(tone.css_class());
        }
        if snapshot.highlighted.contains(&CellRef { category, day }) {
            classes.push("flash");
        }
        let disabled = if count == 0 { " disabled" } else { "" };
        let _ = write!(
            out,
            r#"  <td>
    <div class="{classes}">
      <form class="step-form" method="post" action="/portions/step">
        <input type="hidden" name="category" value="{label}" />
        <input type="hidden" name="day" value="{day}" />
        <input type="hidden" name="delta" value="-1" />
        <button type="submit" class="step" aria-label="Decrease portion"{disabled}>−</button>
      </form>
      <span class="count">{count}</span>
      <form class="step-form" method="post" action="/portions/step">
        <input type="hidden" name="category" value="{label}" />
        <input type="hidden" name="day" value="{day}" />
        <input type="hidden" name="delta" value="1" />
        <button type="submit" class="step" aria-label="Increase portion">+</button>
      </form>
    </div>
  </td>
"#,
            classes = classes.join(" "),
            day = day.label(),
        );
    }
    out.push_str("</tr>\n");
}

fn icon(category: NutrientCategory) -> &'static str {
    match category {
        NutrientCategory::Agua => "💧",
        NutrientCategory::Azucar => "🍬",
        NutrientCategory::Carbohidratos => "🌾",
        NutrientCategory::Proteina => "🥩",
        NutrientCategory::Fruta => "🍎",
        NutrientCategory::Grasa => "🥚",
        NutrientCategory::Vegetales => "🥕",
    }
}

const HEAD_HTML: &str = r#"<meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <link rel="manifest" href="/manifest.webmanifest" />
  <title>Nutrient Tracker</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #d9ecd0;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.88);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #eef6e6 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(1280px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: flex-end;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    .subtitle {
      margin: 6px 0 0;
      color: #5f5c57;
    }

    .table-wrap {
      overflow-x: auto;
    }

    table {
      width: 100%;
      border-collapse: collapse;
    }

    th {
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.08em;
      color: #8b857d;
      padding: 10px 6px;
      text-align: center;
      white-space: nowrap;
    }

    th.today {
      color: var(--accent);
    }

    td {
      padding: 6px;
      border-top: 1px solid rgba(47, 72, 88, 0.08);
    }

    tr.dragging {
      opacity: 0.4;
    }

    tr.drop-target td {
      border-top: 2px solid var(--accent);
    }

    .handle {
      cursor: grab;
      color: #b3ada6;
      user-select: none;
    }

    .name {
      font-weight: 500;
      white-space: nowrap;
    }

    .icon {
      margin-right: 10px;
    }

    input[type="number"] {
      width: 88px;
      height: 40px;
      border-radius: 12px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 0 10px;
      font: inherit;
    }

    .portion {
      display: flex;
      align-items: center;
      justify-content: center;
      gap: 4px;
      border-radius: 12px;
      transition: background-color 300ms ease;
    }

    .portion form {
      margin: 0;
    }

    .tone-under {
      background: rgba(134, 239, 172, 0.35);
    }

    .tone-near {
      background: rgba(253, 224, 71, 0.35);
    }

    .tone-limit {
      background: rgba(252, 165, 165, 0.45);
    }

    .portion.flash {
      box-shadow: 0 0 0 2px rgba(255, 107, 74, 0.45);
    }

    .count {
      font-family: ui-monospace, monospace;
      font-size: 1.1rem;
      width: 1.6em;
      text-align: center;
    }

    button {
      appearance: none;
      border: none;
      cursor: pointer;
      font: inherit;
    }

    .step {
      width: 32px;
      height: 32px;
      border-radius: 10px;
      background: transparent;
      font-size: 1.1rem;
    }

    .step:hover:not(:disabled) {
      background: rgba(47, 72, 88, 0.08);
    }

    .step:disabled {
      cursor: default;
      opacity: 0.3;
    }

    .btn-reset {
      border-radius: 999px;
      padding: 12px 20px;
      font-weight: 600;
      background: var(--accent-2);
      color: white;
      box-shadow: 0 10px 24px rgba(47, 72, 88, 0.3);
    }

    .bone {
      display: inline-block;
      height: 20px;
      width: 48px;
      border-radius: 8px;
      background: rgba(47, 72, 88, 0.1);
      animation: pulse 1.2s ease-in-out infinite;
    }

    .bone.wide {
      width: 128px;
    }

    .bone.cell {
      width: 88px;
      height: 32px;
    }

    @keyframes pulse {
      50% {
        opacity: 0.45;
      }
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 18px;
      }
    }
  </style>"#;

const SKELETON_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  {{HEAD}}
  <meta http-equiv="refresh" content="1" />
</head>
<body>
  <main class="app" aria-busy="true">
    <header>
      <div>
        <span class="bone wide"></span>
      </div>
    </header>
    <div class="table-wrap">
      <table>
        <tbody>{{ROWS}}</tbody>
      </table>
    </div>
  </main>
</body>
</html>
"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  {{HEAD}}
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Nutrient Tracker</h1>
        <p class="subtitle">Marque sus porciones diarias para cada categoría de nutrientes a continuación.</p>
      </div>
      <form method="post" action="/reset" id="reset-form">
        <button class="btn-reset" type="submit">Reiniciar semana</button>
      </form>
    </header>

    <div class="table-wrap">
      <table>
        <thead>
          <tr>
            <th></th>
            <th>Nutriente</th>
            <th>Porciones Máx.</th>
            {{DAYS}}
          </tr>
        </thead>
        <tbody id="rows">{{ROWS}}</tbody>
      </table>
    </div>
  </main>

  <script>
    const rowsEl = document.getElementById('rows');
    const FLASH_MS = 300;
    let dragFrom = null;
    let dragTo = null;

    const send = async (payload) => {
      const res = await fetch('/api/action', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(payload)
      });
      if (!res.ok) {
        throw new Error(await res.text() || 'Request failed');
      }
      await refreshRows();
    };

    const refreshRows = async () => {
      const res = await fetch('/table');
      if (!res.ok) {
        throw new Error('Unable to load table');
      }
      rowsEl.innerHTML = await res.text();
      setTimeout(() => {
        rowsEl.querySelectorAll('.flash').forEach((el) => el.classList.remove('flash'));
      }, FLASH_MS);
    };

    const report = (err) => console.error('tracker request failed:', err);

    rowsEl.addEventListener('submit', (event) => {
      const form = event.target;
      const data = new FormData(form);
      if (form.classList.contains('step-form')) {
        event.preventDefault();
        send({
          action: 'stepPortions',
          category: data.get('category'),
          day: data.get('day'),
          delta: Number(data.get('delta'))
        }).catch(report);
      } else if (form.classList.contains('max-form')) {
        event.preventDefault();
        const value = parseInt(data.get('value'), 10);
        if (Number.isNaN(value)) {
          return;
        }
        send({ action: 'setMaxPortions', category: data.get('category'), value }).catch(report);
      }
    });

    rowsEl.addEventListener('change', (event) => {
      const form = event.target.closest('.max-form');
      if (form) {
        form.requestSubmit();
      }
    });

    document.getElementById('reset-form').addEventListener('submit', (event) => {
      event.preventDefault();
      send({ action: 'reset' }).catch(report);
    });

    rowsEl.addEventListener('dragstart', (event) => {
      const row = event.target.closest('tr');
      dragFrom = Number(row.dataset.index);
      dragTo = null;
      row.classList.add('dragging');
      event.dataTransfer.effectAllowed = 'move';
    });

    rowsEl.addEventListener('dragover', (event) => {
      const row = event.target.closest('tr');
      if (!row) {
        return;
      }
      event.preventDefault();
      dragTo = Number(row.dataset.index);
      rowsEl.querySelectorAll('.drop-target').forEach((el) => el.classList.remove('drop-target'));
      row.classList.add('drop-target');
    });

    rowsEl.addEventListener('drop', (event) => {
      event.preventDefault();
      send({ action: 'reorder', from: dragFrom, to: dragTo }).catch(report);
    });

    rowsEl.addEventListener('dragend', () => {
      rowsEl.querySelectorAll('.dragging, .drop-target').forEach((el) => {
        el.classList.remove('dragging', 'drop-target');
      });
      dragFrom = null;
      dragTo = null;
    });

    setTimeout(() => {
      rowsEl.querySelectorAll('.flash').forEach((el) => el.classList.remove('flash'));
    }, FLASH_MS);
  </script>
</body>
</html>
"#;
