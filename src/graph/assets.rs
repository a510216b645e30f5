/// Embedded viewer page for a woven thread.
///
/// Served at `/` by the local server, or written standalone with the rendered
/// graph inlined by [`super::generate_static_html`]. The placeholder
/// `/*__STATIC_DATA__*/null` is replaced in static exports.
pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Thread Weaver</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #09090b;
            color: #e4e4e7;
            overflow: hidden;
        }

        #container { display: flex; height: 100vh; }
        #main { flex: 1; position: relative; }
        #graph { width: 100%; height: 100%; }

        #feed {
            display: none;
            height: 100%;
            overflow-y: auto;
            padding: 24px 48px;
        }

        #sidebar {
            width: 340px;
            background: #18181b;
            border-left: 1px solid #27272a;
            padding: 20px;
            display: flex;
            flex-direction: column;
            gap: 14px;
        }

        h1 { font-size: 1.2em; color: #a5b4fc; }
        h2 { font-size: 0.8em; color: #71717a; text-transform: uppercase; letter-spacing: 1px; }

        .stat { display: flex; justify-content: space-between; font-size: 0.9em; }
        .stat-value { color: #6366f1; font-weight: bold; }

        .tabs button, #chat-form button {
            background: #27272a;
            color: #e4e4e7;
            border: 1px solid #3f3f46;
            border-radius: 4px;
            padding: 6px 12px;
            cursor: pointer;
        }
        .tabs button.active { background: #6366f1; border-color: #6366f1; }

        #details { font-size: 0.9em; line-height: 1.4; min-height: 80px; }
        #details a { color: #818cf8; }

        #chat-log {
            flex: 1;
            overflow-y: auto;
            font-size: 0.85em;
            border-top: 1px solid #27272a;
            padding-top: 8px;
        }
        #chat-log .q { color: #a1a1aa; margin-top: 8px; }
        #chat-log .a { white-space: pre-wrap; }
        #chat-log .err { color: #f87171; }

        #chat-form { display: flex; gap: 6px; }
        #chat-form input {
            flex: 1;
            background: #09090b;
            color: #e4e4e7;
            border: 1px solid #3f3f46;
            border-radius: 4px;
            padding: 6px;
        }

        .node rect { rx: 8; ry: 8; stroke-width: 1.5; }
        .node text { fill: #e4e4e7; font-size: 13px; pointer-events: none; }
        .node { cursor: pointer; }
        .edge.animated { animation: flow 1s linear infinite; stroke-dasharray: 6 4; }
        @keyframes flow { to { stroke-dashoffset: -10; } }

        .section { margin-bottom: 28px; }
        .section h3 { color: #a5b4fc; margin-bottom: 6px; }
        .section .summary { color: #a1a1aa; margin-bottom: 10px; }
        .comment { border-left: 2px solid #3f3f46; padding: 6px 12px; margin: 6px 0; }
        .comment .author { color: #6366f1; font-weight: bold; }
        .sentiment { color: #71717a; font-size: 0.85em; margin-left: 6px; }
    </style>
</head>
<body>
    <div id="container">
        <div id="main">
            <svg id="graph"></svg>
            <div id="feed"></div>
        </div>
        <div id="sidebar">
            <h1 id="title">Thread Weaver</h1>
            <div class="tabs">
                <button id="tab-map" class="active">Map</button>
                <button id="tab-feed">Feed</button>
            </div>
            <div>
                <div class="stat"><span>Topics</span><span class="stat-value" id="stat-topics">0</span></div>
                <div class="stat"><span>Comments</span><span class="stat-value" id="stat-comments">0</span></div>
                <div class="stat"><span>Hidden</span><span class="stat-value" id="stat-hidden">0</span></div>
            </div>
            <div>
                <h2>Density <span id="density-label">100%</span></h2>
                <input id="density" type="range" min="10" max="100" step="10" value="100" style="width:100%">
            </div>
            <h2>Selected</h2>
            <div id="details">Click a node to see its neighbours.</div>
            <h2 id="chat-heading">Ask about this thread</h2>
            <div id="chat-log"></div>
            <form id="chat-form">
                <input id="question" placeholder="What was the main disagreement?" autocomplete="off">
                <button type="submit">Ask</button>
            </form>
        </div>
    </div>

    <script>
        const STATIC_DATA = /*__STATIC_DATA__*/null;
        const state = { selected: null, density: 100, rendered: null };

        const svg = d3.select('#graph');
        const layer = svg.append('g');
        const zoom = d3.zoom().scaleExtent([0.05, 3]).on('zoom', (event) => {
            layer.attr('transform', event.transform);
        });
        svg.call(zoom);

        function escapeHtml(text) {
            const div = document.createElement('div');
            div.textContent = text == null ? '' : String(text);
            return div.innerHTML;
        }

        // Without a server the neighbourhood and density are computed here.
        function renderLocally() {
            const graph = STATIC_DATA.rendered;
            const comments = graph.nodes.filter(n => n.type === 'comment');
            const keep = new Set(comments.slice(0, Math.floor(comments.length * state.density / 100)).map(n => n.id));
            const nodes = graph.nodes.filter(n => n.type !== 'comment' || keep.has(n.id));
            const visible = new Set(nodes.map(n => n.id));
            const edges = graph.edges.filter(e => visible.has(e.source) && visible.has(e.target));

            const lit = new Set();
            const litEdges = new Set();
            if (state.selected) {
                lit.add(state.selected);
                edges.forEach(e => {
                    if (e.source === state.selected || e.target === state.selected) {
                        lit.add(e.source); lit.add(e.target); litEdges.add(e.id);
                    }
                });
            }
            const dim = (hit) => state.selected && !hit ? 0.1 : 1.0;
            return {
                nodes: nodes.map(n => ({ ...n, highlighted: lit.has(n.id), opacity: dim(lit.has(n.id)) })),
                edges: edges.map(e => ({ ...e, opacity: dim(litEdges.has(e.id)) })),
                selected: state.selected,
                density: state.density,
                hidden_comments: comments.length - keep.size,
            };
        }

        async function loadGraph() {
            if (STATIC_DATA) {
                return renderLocally();
            }
            const params = new URLSearchParams({ density: state.density });
            if (state.selected) params.set('selected', state.selected);
            const response = await fetch('/api/graph?' + params);
            return response.json();
        }

        async function loadFeed() {
            if (STATIC_DATA) return STATIC_DATA.feed;
            const response = await fetch('/api/feed');
            return response.json();
        }

        async function loadStatus() {
            if (STATIC_DATA) return STATIC_DATA.status;
            const response = await fetch('/api/status');
            return response.json();
        }

        function fillColor(node) {
            if (node.type === 'root') return '#312e81';
            if (node.type === 'topic') return '#1e1b4b';
            return '#18181b';
        }

        function drawGraph(graph) {
            state.rendered = graph;
            const byId = new Map(graph.nodes.map(n => [n.id, n]));

            layer.selectAll('*').remove();

            layer.append('g').selectAll('line')
                .data(graph.edges)
                .join('line')
                .attr('class', d => 'edge' + (d.animated ? ' animated' : ''))
                .attr('x1', d => byId.get(d.source).position.x)
                .attr('y1', d => byId.get(d.source).position.y)
                .attr('x2', d => byId.get(d.target).position.x)
                .attr('y2', d => byId.get(d.target).position.y)
                .attr('stroke', d => d.stroke)
                .attr('stroke-width', d => d.stroke_width)
                .attr('stroke-dasharray', d => d.dash || null)
                .attr('opacity', d => d.opacity);

            const node = layer.append('g').selectAll('g')
                .data(graph.nodes)
                .join('g')
                .attr('class', 'node')
                .attr('transform', d => `translate(${d.position.x},${d.position.y})`)
                .attr('opacity', d => d.opacity)
                .on('click', (event, d) => {
                    event.stopPropagation();
                    state.selected = state.selected === d.id ? null : d.id;
                    refresh();
                });

            node.append('rect')
                .attr('x', -90).attr('y', -22).attr('width', 180).attr('height', 44)
                .attr('fill', fillColor)
                .attr('stroke', d => d.highlighted ? '#6366f1' : '#3f3f46');

            node.append('text')
                .attr('text-anchor', 'middle')
                .attr('dy', '0.35em')
                .text(d => d.data.label.length > 24 ? d.data.label.slice(0, 23) + '…' : d.data.label);

            svg.on('click', () => {
                if (state.selected) {
                    state.selected = null;
                    refresh();
                }
            });

            document.getElementById('stat-hidden').textContent = graph.hidden_comments;
            showDetails(graph.nodes.find(n => n.id === graph.selected));
        }

        function showDetails(node) {
            const details = document.getElementById('details');
            if (!node) {
                details.textContent = 'Click a node to see its neighbours.';
                return;
            }
            const d = node.data;
            details.innerHTML = `
                <div><b>${escapeHtml(d.author || d.label)}</b>
                ${d.sentiment ? `<span class="sentiment">${escapeHtml(d.sentiment)}</span>` : ''}</div>
                <div>${escapeHtml(d.content || '')}</div>
                ${d.link ? `<a href="${escapeHtml(d.link)}" target="_blank" rel="noopener">Open comment</a>` : ''}`;
        }

        function drawFeed(sections) {
            const feed = document.getElementById('feed');
            feed.innerHTML = sections
                .filter(s => s.head.type !== 'root' || s.comments.length > 0)
                .map(s => `
                <div class="section">
                    <h3>${s.head.type === 'root' ? 'Added in chat' : escapeHtml(s.head.data.label)}</h3>
                    ${s.head.type === 'topic' ? `<div class="summary">${escapeHtml(s.head.data.content || '')}</div>` : ''}
                    ${s.comments.map(c => `
                        <div class="comment">
                            <span class="author">${escapeHtml(c.data.author || c.data.label)}</span>
                            ${c.data.sentiment ? `<span class="sentiment">${escapeHtml(c.data.sentiment)}</span>` : ''}
                            <div>${escapeHtml(c.data.content || '')}</div>
                        </div>`).join('')}
                </div>`).join('');
        }

        async function refresh() {
            drawGraph(await loadGraph());
        }

        async function refreshStatus() {
            const status = await loadStatus();
            if (status.title) document.getElementById('title').textContent = status.title;
            document.getElementById('stat-topics').textContent = status.topics;
            document.getElementById('stat-comments').textContent = status.comments;
        }

        function setView(mode) {
            const isFeed = mode === 'feed';
            document.getElementById('graph').style.display = isFeed ? 'none' : 'block';
            document.getElementById('feed').style.display = isFeed ? 'block' : 'none';
            document.getElementById('tab-map').classList.toggle('active', !isFeed);
            document.getElementById('tab-feed').classList.toggle('active', isFeed);
            if (isFeed) loadFeed().then(drawFeed);
        }

        document.getElementById('tab-map').onclick = () => setView('map');
        document.getElementById('tab-feed').onclick = () => setView('feed');

        document.getElementById('density').addEventListener('change', (event) => {
            state.density = Number(event.target.value);
            document.getElementById('density-label').textContent = state.density + '%';
            refresh();
        });

        function logChat(cls, text) {
            const log = document.getElementById('chat-log');
            const entry = document.createElement('div');
            entry.className = cls;
            entry.textContent = text;
            log.appendChild(entry);
            log.scrollTop = log.scrollHeight;
        }

        document.getElementById('chat-form').addEventListener('submit', async (event) => {
            event.preventDefault();
            const input = document.getElementById('question');
            const button = event.target.querySelector('button');
            const question = input.value.trim();
            if (!question) return;

            logChat('q', question);
            input.value = '';
            button.disabled = true;
            try {
                const response = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ question }),
                });
                const body = await response.json();
                if (!response.ok) {
                    logChat('err', body.error || 'Request failed');
                } else {
                    logChat('a', body.answer);
                    if (body.added > 0) {
                        logChat('q', `+${body.added} node(s) added to the map`);
                        await refresh();
                        await refreshStatus();
                    }
                }
            } catch (err) {
                logChat('err', String(err));
            } finally {
                button.disabled = false;
            }
        });

        if (STATIC_DATA) {
            document.getElementById('chat-form').style.display = 'none';
            document.getElementById('chat-heading').style.display = 'none';
        }

        function centerView() {
            const box = document.getElementById('graph').getBoundingClientRect();
            svg.call(zoom.transform, d3.zoomIdentity.translate(box.width / 2, box.height / 2).scale(0.35));
        }

        refreshStatus();
        refresh().then(centerView);
    </script>
</body>
</html>
"#;

pub const STATIC_DATA_PLACEHOLDER: &str = "/*__STATIC_DATA__*/null";
