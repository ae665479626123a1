pub const DIFF2HTML_CSS: &str =
    "https://cdn.jsdelivr.net/npm/diff2html@3.4.48/bundles/css/diff2html.min.css";
pub const DIFF2HTML_JS: &str =
    "https://cdn.jsdelivr.net/npm/diff2html@3.4.48/bundles/js/diff2html-ui.min.js";

pub const STYLE: &str = r#"
body {
    margin: 0;
    font-family: 'JetBrains Mono', ui-monospace, monospace;
    background-color: #f8f9fa;
    color: #212529;
}
.layout { display: flex; min-height: 100vh; }
.sidebar { width: 160px; background: #2d333b; flex-shrink: 0; }
.sidebar-tabs { list-style: none; margin: 0; padding: 12px 0; }
.sidebar-tab {
    padding: 12px 16px;
    color: #adbac7;
    cursor: pointer;
    border-left: 3px solid transparent;
}
.sidebar-tab:hover { background: #444c56; }
.sidebar-tab.active { background: #444c56; color: #fff; border-left-color: #2f81f7; }
.main-content { flex: 1; overflow-y: auto; padding: 20px; }
.project-section { display: none; max-width: 1200px; margin: 0 auto; }
.project-section.active { display: block; }
.project-path { color: #6c757d; font-size: 12px; margin: 0 0 16px 0; }
.section {
    margin-bottom: 30px;
    background: white;
    border-radius: 12px;
    box-shadow: 0 2px 8px rgba(0, 0, 0, 0.05);
    overflow: hidden;
}
.section-header {
    display: flex;
    align-items: center;
    justify-content: space-between;
    padding: 20px;
    background-color: #f8f9fa;
    border-bottom: 1px solid #e9ecef;
}
.section-title { margin: 0; font-size: 18px; color: #2d3748; }
.section-title .count { font-size: 14px; color: #6c757d; font-weight: normal; }
.batch-buttons { display: flex; gap: 10px; }
.batch-button, .file-button {
    border: none;
    border-radius: 6px;
    cursor: pointer;
    font-family: inherit;
    color: white;
}
.batch-button { padding: 8px 16px; font-size: 13px; }
.file-button { padding: 4px 8px; font-size: 12px; margin-left: 10px; }
.batch-button:disabled { background-color: #e9ecef; color: #adb5bd; cursor: not-allowed; }
.stage-all, .stage-button { background-color: #0d6efd; }
.undo-all, .undo-button { background-color: #dc3545; }
.commit-button { background-color: #28a745; }
.stats {
    display: flex;
    gap: 20px;
    padding: 12px 20px;
    border-bottom: 1px solid #e9ecef;
    font-size: 13px;
    color: #6c757d;
}
.stats span { background-color: #e9ecef; padding: 2px 8px; border-radius: 4px; color: #2d3748; }
.no-changes { padding: 0 20px; color: #6c757d; }
.file-item { border-bottom: 1px solid #e9ecef; }
.file-header {
    padding: 12px 20px;
    display: flex;
    align-items: center;
    gap: 10px;
    cursor: pointer;
}
.file-header:hover { background-color: #f8f9fa; }
.file-number {
    background-color: #6c757d;
    color: white;
    padding: 2px 8px;
    border-radius: 12px;
    font-size: 12px;
}
.file-name { flex-grow: 1; font-style: italic; word-break: break-all; }
.file-status { padding: 2px 8px; border-radius: 12px; font-size: 12px; }
.status-M { background-color: #ffc107; color: #000; }
.status-A { background-color: #28a745; color: white; }
.status-D { background-color: #dc3545; color: white; }
.status-U { background-color: #6c757d; color: white; }
.diff-content { display: none; padding: 15px; background: #fafafa; }
.diff-content.active { display: block; }
.raw-diff { margin: 0; white-space: pre-wrap; font-size: 12px; }
.d2h-file-header { display: none; }
.modal {
    display: none;
    position: fixed;
    inset: 0;
    background-color: rgba(0, 0, 0, 0.5);
    z-index: 1000;
}
.modal.open { display: block; }
.modal-content {
    position: absolute;
    top: 50%;
    left: 50%;
    transform: translate(-50%, -50%);
    background-color: white;
    padding: 24px;
    border-radius: 12px;
    width: 400px;
}
.form-group { margin-bottom: 20px; }
.form-group label { display: block; margin-bottom: 8px; font-size: 14px; }
.form-group select, .form-group input {
    width: 100%;
    box-sizing: border-box;
    padding: 10px 12px;
    border: 1px solid #e2e8f0;
    border-radius: 8px;
    font-family: inherit;
}
.modal-buttons { display: flex; justify-content: flex-end; gap: 12px; }
.modal-button { padding: 10px 20px; border-radius: 8px; cursor: pointer; font-family: inherit; }
.modal-button.primary { background-color: #0d6efd; color: white; border: none; }
.modal-button.primary:disabled { background-color: #e2e8f0; color: #a0aec0; cursor: not-allowed; }
.modal-button.secondary { background-color: #f8f9fa; border: 1px solid #e2e8f0; }
.loading {
    position: fixed;
    inset: 0;
    background: rgba(255, 255, 255, 0.8);
    display: flex;
    justify-content: center;
    align-items: center;
    z-index: 2000;
}
.footer { color: #adb5bd; font-size: 11px; text-align: right; }
"#;

/// Client logic. Reads its configuration from `window.DIFFDECK`; every
/// handler is delegated from `document` so it survives body swaps on refresh.
pub const SCRIPT: &str = r#"
(function () {
    const config = window.DIFFDECK;
    let activeProject = 0;

    function showLoading(text) {
        const loading = document.createElement('div');
        loading.className = 'loading';
        loading.textContent = text;
        document.body.appendChild(loading);
        return loading;
    }

    async function post(path, body) {
        const response = await fetch(config.serverUrl + path, {
            method: 'POST',
            headers: { 'Content-Type': 'application/json' },
            body: JSON.stringify(body)
        });
        if (!response.ok) {
            let message = response.statusText;
            try {
                const data = await response.json();
                message = data.error || message;
            } catch (_) {}
            throw new Error(message);
        }
        return response;
    }

    function drawDiffs() {
        if (typeof Diff2HtmlUI === 'undefined') {
            return;
        }
        document.querySelectorAll('.d2h-target').forEach(target => {
            const raw = target.querySelector('.raw-diff');
            if (!raw || !raw.textContent) {
                return;
            }
            const ui = new Diff2HtmlUI(target, raw.textContent, {
                drawFileList: false,
                matching: 'lines',
                outputFormat: 'side-by-side'
            });
            ui.draw();
        });
    }

    function switchProject(index) {
        activeProject = index;
        document.querySelectorAll('.sidebar-tab').forEach(tab => {
            tab.classList.toggle('active', Number(tab.dataset.project) === index);
        });
        document.querySelectorAll('.project-section').forEach(section => {
            section.classList.toggle('active', Number(section.dataset.project) === index);
        });
    }

    function activeRepoPath() {
        const project = config.projects[activeProject] || config.projects[0];
        return project ? project.repoPath : null;
    }

    async function refresh(withLoading) {
        const loading = withLoading ? showLoading('Refreshing...') : null;
        try {
            const response = await post('/refresh', {
                repoPaths: config.projects.map(p => p.repoPath)
            });
            const html = await response.text();
            const scroll = { x: window.scrollX, y: window.scrollY };
            const doc = new DOMParser().parseFromString(html, 'text/html');
            document.body.innerHTML = doc.body.innerHTML;
            switchProject(activeProject);
            drawDiffs();
            window.scrollTo(scroll.x, scroll.y);
        } catch (error) {
            alert('Failed to refresh: ' + error.message);
        } finally {
            if (loading) {
                loading.remove();
            }
        }
    }

    async function mutate(text, path, body) {
        const loading = showLoading(text);
        try {
            await post(path, body);
            await refresh(false);
            return true;
        } catch (error) {
            alert(error.message);
            return false;
        } finally {
            loading.remove();
        }
    }

    function openCommitModal() {
        const section = document.querySelector('.project-section.active');
        if (section && section.querySelector('.working-file')) {
            alert('Please stage all working changes before committing.');
            return;
        }
        document.getElementById('commitMessage').value = '';
        validateCommitForm();
        document.getElementById('commitModal').classList.add('open');
    }

    function closeCommitModal() {
        document.getElementById('commitModal').classList.remove('open');
    }

    function validateCommitForm() {
        const message = document.getElementById('commitMessage').value.trim();
        document.getElementById('createCommitButton').disabled = !message;
    }

    async function createCommit() {
        const type = document.getElementById('commitType').value;
        const message = document.getElementById('commitMessage').value.trim();
        const ok = await mutate('Creating commit...', '/commit', {
            repoPath: activeRepoPath(),
            type,
            message
        });
        if (ok) {
            closeCommitModal();
        }
    }

    document.addEventListener('click', event => {
        const tab = event.target.closest('.sidebar-tab');
        if (tab) {
            switchProject(Number(tab.dataset.project));
            return;
        }

        const button = event.target.closest('[data-action]');
        if (button) {
            event.stopPropagation();
            const { action, repo, file, area } = button.dataset;
            switch (action) {
                case 'stage':
                    mutate('Staging file...', '/stage', { repoPath: repo, file });
                    break;
                case 'undo': {
                    const command = area === 'staged' ? 'unstage' : 'discard';
                    if (command === 'discard' &&
                        !confirm('Discard working changes to ' + file + '? This cannot be undone!')) {
                        return;
                    }
                    mutate('Undoing changes...', '/undo', { command, repoPath: repo, file });
                    break;
                }
                case 'stage-all':
                    if (confirm('Are you sure you want to stage all changes?')) {
                        mutate('Staging all changes...', '/stage-all', { repoPath: repo });
                    }
                    break;
                case 'undo-all-working':
                    if (confirm('Are you sure you want to undo all working changes? This cannot be undone!')) {
                        mutate('Undoing all changes...', '/undo-all-working', { repoPath: repo });
                    }
                    break;
                case 'open-commit':
                    openCommitModal();
                    break;
                case 'close-commit':
                    closeCommitModal();
                    break;
                case 'create-commit':
                    createCommit();
                    break;
                case 'refresh':
                    refresh(true);
                    break;
            }
            return;
        }

        const header = event.target.closest('.file-header');
        if (header) {
            const content = document.getElementById(header.dataset.target);
            if (content) {
                content.classList.toggle('active');
            }
            return;
        }

        if (event.target.id === 'commitModal') {
            closeCommitModal();
        }
    });

    document.addEventListener('input', event => {
        if (event.target.id === 'commitMessage') {
            validateCommitForm();
        }
    });

    window.addEventListener('load', () => {
        switchProject(0);
        drawDiffs();
    });
})();
"#;
