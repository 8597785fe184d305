use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::answer::AnswerGenerator;
use crate::completion::ChatBackend;
use crate::error::{AnswerError, CompletionError, UtilityError};
use crate::persona::Persona;
use crate::utility::{self, UtilityMode, UtilityRequest};

const MAX_REQUEST_HEAD: usize = 16 * 1024;
const MAX_HEADERS: usize = 32;

/// Per-connection bounds on what a client may send.
#[derive(Debug, Clone, Copy)]
pub struct ServerLimits {
    /// Time allowed to deliver the whole request, head and body.
    pub read_timeout: Duration,
    pub max_body: usize,
}

impl Default for ServerLimits {
    fn default() -> Self {
        ServerLimits {
            read_timeout: Duration::from_secs(30),
            max_body: 1024 * 1024,
        }
    }
}

/// Shared, read-only state handed to every connection.
pub struct AppState<B> {
    pub generator: AnswerGenerator<B>,
    pub limits: ServerLimits,
}

impl<B: ChatBackend> AppState<B> {
    pub fn new(generator: AnswerGenerator<B>) -> Self {
        Self::with_limits(generator, ServerLimits::default())
    }

    pub fn with_limits(generator: AnswerGenerator<B>, limits: ServerLimits) -> Self {
        AppState { generator, limits }
    }
}

/// Embedded single-page UI. `{{PERSONA_OPTIONS}}` is filled in by [`index_html`].
const INDEX_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Persona Desk</title>
<style>
*{margin:0;padding:0;box-sizing:border-box}
body{background:#0d1117;color:#c9d1d9;font-family:'Cascadia Code','Fira Code',monospace;min-height:100vh}
header{padding:16px 24px;border-bottom:1px solid #21262d}
header h1{font-size:1.2rem;color:#58a6ff}
header p{font-size:.8rem;color:#8b949e;margin-top:4px}
main{max-width:860px;margin:0 auto;padding:16px 24px;display:flex;flex-direction:column;gap:20px}
section{background:#161b22;border:1px solid #21262d;border-radius:6px;padding:16px}
section h2{font-size:.9rem;color:#58a6ff;margin-bottom:10px;text-transform:uppercase;letter-spacing:.5px}
.howto{font-size:.78rem;color:#8b949e;background:#0d1117;border-left:3px solid #1f6feb;padding:8px 12px;margin-bottom:12px;line-height:1.6}
.field{display:flex;flex-direction:column;gap:3px;margin-bottom:10px}
.field label,.legend{font-size:.7rem;color:#8b949e;text-transform:uppercase;letter-spacing:.5px}
.field input,.field select{background:#0d1117;border:1px solid #30363d;color:#c9d1d9;padding:6px 10px;border-radius:6px;font-family:inherit;font-size:.85rem}
.field input:focus,.field select:focus{outline:none;border-color:#58a6ff}
.radios{display:flex;gap:16px;margin:4px 0 10px}
.radios label{font-size:.85rem;cursor:pointer;display:flex;align-items:center;gap:5px}
.radios input{accent-color:#58a6ff}
.btn{border:none;padding:6px 14px;border-radius:6px;font-family:inherit;font-size:.85rem;cursor:pointer;color:#fff;background:#238636}
.btn:hover{background:#2ea043}
.btn:disabled{background:#21262d;color:#484f58;cursor:not-allowed}
.out{margin-top:12px;line-height:1.7;white-space:pre-wrap;word-wrap:break-word;font-size:.95rem}
.out h3{font-size:.85rem;color:#e3b341;margin-bottom:6px}
.warn{color:#e3b341}
.err{color:#f85149}
.ok{color:#3fb950}
.busy{color:#8b949e;animation:pulse 1.2s ease-in-out infinite}
@keyframes pulse{0%,100%{opacity:1}50%{opacity:.4}}
.hidden{display:none}
</style>
</head>
<body>
<header>
  <h1>Persona Desk</h1>
  <p>Ask the expert of your choice a question. The answer comes from a language model playing that role.</p>
</header>
<main>
<section id="answer-panel">
  <h2>Expert answers</h2>
  <div class="howto">
    1. Choose the kind of expert you want to consult.<br>
    2. Type your question in the field below.<br>
    3. Press the button and the expert's answer appears underneath.
  </div>
  <div class="legend">Choose an expert</div>
  <div class="radios" id="personas">{{PERSONA_OPTIONS}}</div>
  <div class="field"><label for="question">Your question</label><input type="text" id="question" placeholder="Type your question..."></div>
  <button class="btn" id="ask">Generate answer</button>
  <div class="out" id="answer-out"></div>
</section>
<section id="utility-panel">
  <h2>Utilities</h2>
  <div class="field"><label for="mode">Mode</label>
    <select id="mode"><option value="chars">character count</option><option value="bmi">BMI</option></select>
  </div>
  <div id="fields-chars">
    <div class="field"><label for="text">Text</label><input type="text" id="text" placeholder="Text to count..."></div>
  </div>
  <div id="fields-bmi" class="hidden">
    <div class="field"><label for="height">Height (cm)</label><input type="text" id="height" placeholder="170"></div>
    <div class="field"><label for="weight">Weight (kg)</label><input type="text" id="weight" placeholder="65"></div>
  </div>
  <button class="btn" id="run">Execute</button>
  <div class="out" id="utility-out"></div>
</section>
</main>
<script>
const $=s=>document.querySelector(s);

function show(el,cls,text){el.innerHTML='';const d=document.createElement('div');d.className=cls;d.textContent=text;el.appendChild(d)}

async function postForm(url,data){
  const r=await fetch(url,{method:'POST',body:new URLSearchParams(data)});
  const ct=r.headers.get('content-type')||'';
  if(!ct.includes('application/json'))throw new Error('HTTP '+r.status);
  return r.json();
}

$('#ask').onclick=async()=>{
  const persona=(document.querySelector('input[name=persona]:checked')||{}).value||'';
  const question=$('#question').value;
  const out=$('#answer-out');
  if(!question){show(out,'warn','Please enter a question.');return}
  $('#ask').disabled=true;
  show(out,'busy','Generating answer...');
  try{
    const res=await postForm('/api/ask',{persona,question});
    if(res.status==='ok'){
      out.innerHTML='';
      const h=document.createElement('h3');h.textContent=res.heading;out.appendChild(h);
      const p=document.createElement('div');p.textContent=res.answer;out.appendChild(p);
    }else if(res.status==='warning'){show(out,'warn',res.message)}
    else{show(out,'err',res.message)}
  }catch(e){show(out,'err','Request failed: '+e.message)}
  finally{$('#ask').disabled=false}
};

$('#mode').onchange=function(){
  ['text','height','weight'].forEach(id=>{$('#'+id).value=''});
  $('#utility-out').innerHTML='';
  $('#fields-chars').classList.toggle('hidden',this.value!=='chars');
  $('#fields-bmi').classList.toggle('hidden',this.value!=='bmi');
};

$('#run').onclick=async()=>{
  const mode=$('#mode').value;
  const out=$('#utility-out');
  const data=mode==='chars'?{mode,text:$('#text').value}:{mode,height:$('#height').value,weight:$('#weight').value};
  try{
    const res=await postForm('/api/utility',data);
    if(res.status==='ok'){show(out,'ok',res.display)}else{show(out,'err',res.message)}
  }catch(e){show(out,'err','Request failed: '+e.message)}
};
</script>
</body>
</html>"##;

/// Render the page with one radio button per persona; the first is preselected.
pub fn index_html() -> String {
    let options: String = Persona::ALL
        .iter()
        .enumerate()
        .map(|(i, p)| {
            format!(
                r#"<label><input type="radio" name="persona" value="{label}"{checked}> {label}</label>"#,
                label = p.label(),
                checked = if i == 0 { " checked" } else { "" },
            )
        })
        .collect();
    INDEX_TEMPLATE.replace("{{PERSONA_OPTIONS}}", &options)
}

/// Percent-decoding for URL query parameters. Decoded bytes are read as UTF-8.
pub fn url_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' => {
                let hex = s.get(i + 1..i + 3).and_then(|h| u8::from_str_radix(h, 16).ok());
                match hex {
                    Some(byte) => {
                        out.push(byte);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Parse query string into key-value pairs.
pub fn parse_query(query: &str) -> HashMap<String, String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let val = parts.next().unwrap_or("");
            Some((url_decode(key), url_decode(val)))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn json(status: u16, value: serde_json::Value) -> Self {
        HttpResponse { status, content_type: "application/json", body: value.to_string() }
    }

    pub fn html(body: String) -> Self {
        HttpResponse { status: 200, content_type: "text/html; charset=utf-8", body }
    }

    /// JSON error body the page can always display.
    pub fn error(status: u16, message: &str) -> Self {
        Self::json(status, json!({ "status": "error", "message": message }))
    }

    pub fn text(status: u16, body: &str) -> Self {
        HttpResponse { status, content_type: "text/plain; charset=utf-8", body: body.to_string() }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nCache-Control: no-store\r\nConnection: close\r\n\r\n{}",
            self.status,
            reason_phrase(self.status),
            self.content_type,
            self.body.len(),
            self.body,
        )
        .into_bytes()
    }
}

fn reason_phrase(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        408 => "Request Timeout",
        413 => "Payload Too Large",
        422 => "Unprocessable Entity",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// Dispatch one request. Kept free of sockets so it can be driven directly.
///
/// The `/api` form routes take their fields from the query string on GET and
/// from an `application/x-www-form-urlencoded` body on POST.
pub async fn route<B: ChatBackend>(
    method: &str,
    target: &str,
    body: &str,
    state: &AppState<B>,
) -> HttpResponse {
    let (path, query_str) = match target.split_once('?') {
        Some((p, q)) => (p, q),
        None => (target, ""),
    };

    let is_form = matches!(path, "/api/ask" | "/api/utility");
    let params = match method {
        "GET" => parse_query(query_str),
        "POST" if is_form => parse_query(body),
        _ => return HttpResponse::error(405, "Method Not Allowed"),
    };

    match path {
        "/" => HttpResponse::html(index_html()),
        "/health" => HttpResponse::text(200, "ok"),
        "/api/personas" => {
            let labels: Vec<&str> = Persona::ALL.iter().map(|p| p.label()).collect();
            HttpResponse::json(200, json!({ "personas": labels, "default": labels[0] }))
        }
        "/api/ask" => {
            let persona = params.get("persona").map(String::as_str).unwrap_or("");
            let question = params.get("question").map(String::as_str).unwrap_or("");
            ask(state, persona, question).await
        }
        "/api/utility" => run_utility(&params),
        _ => HttpResponse::error(404, "Not Found"),
    }
}

async fn ask<B: ChatBackend>(state: &AppState<B>, persona: &str, question: &str) -> HttpResponse {
    match state.generator.generate(question, persona).await {
        Ok(answer) => HttpResponse::json(
            200,
            json!({
                "status": "ok",
                "persona": answer.persona,
                "heading": answer.heading(),
                "answer": answer.text,
            }),
        ),
        Err(AnswerError::EmptyQuestion) => HttpResponse::json(
            200,
            json!({ "status": "warning", "message": AnswerError::EmptyQuestion.to_string() }),
        ),
        Err(AnswerError::Completion(e)) => HttpResponse::json(
            match e {
                CompletionError::MissingCredential => 503,
                _ => 502,
            },
            json!({ "status": "error", "kind": e.kind(), "message": e.to_string() }),
        ),
    }
}

fn run_utility(params: &HashMap<String, String>) -> HttpResponse {
    let field = |name: &str| params.get(name).cloned().unwrap_or_default();

    let mode = match UtilityMode::from_wire(params.get("mode").map(String::as_str).unwrap_or("")) {
        Ok(m) => m,
        Err(e) => return utility_error(400, &e),
    };
    let request = match mode {
        UtilityMode::CharCount => UtilityRequest::CharCount { text: field("text") },
        UtilityMode::Bmi => UtilityRequest::Bmi { height: field("height"), weight: field("weight") },
    };

    match utility::run(&request) {
        Ok(outcome) => HttpResponse::json(
            200,
            json!({
                "status": "ok",
                "mode": mode.wire(),
                "label": mode.label(),
                "result": outcome.value(),
                "display": outcome.to_string(),
            }),
        ),
        Err(e) => utility_error(422, &e),
    }
}

fn utility_error(status: u16, e: &UtilityError) -> HttpResponse {
    HttpResponse::json(status, json!({ "status": "error", "message": e.to_string() }))
}

/// Bind to the configured address, open the browser if asked, and serve until the process ends.
pub async fn serve<B: ChatBackend + 'static>(
    bind_addr: &str,
    state: Arc<AppState<B>>,
    open_browser: bool,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(bind_addr).await?;
    let local = listener.local_addr()?;
    let url = format!("http://localhost:{}", local.port());

    eprintln!("{}", format!("  Persona Desk running at {url}").bright_green());
    eprintln!("{}", "  Press Ctrl+C to stop.".bright_blue());
    info!(addr = %local, "web UI listening");

    if open_browser {
        launch_browser(&url);
    }

    serve_on(listener, state).await
}

/// Accept loop over an already-bound listener.
pub async fn serve_on<B: ChatBackend + 'static>(
    listener: TcpListener,
    state: Arc<AppState<B>>,
) -> std::io::Result<()> {
    loop {
        let (stream, addr) = listener.accept().await?;
        let state = Arc::clone(&state);
        let span = info_span!("request", id = %Uuid::new_v4(), peer = %addr);
        tokio::spawn(
            async move {
                if let Err(e) = handle_connection(stream, &state).await {
                    error!(error = %e, "connection error");
                }
            }
            .instrument(span),
        );
    }
}

fn launch_browser(url: &str) {
    #[cfg(target_os = "windows")]
    {
        let _ = std::process::Command::new("cmd")
            .args(["/C", &format!("start {url}")])
            .spawn();
    }
    #[cfg(target_os = "macos")]
    {
        let _ = std::process::Command::new("open").arg(url).spawn();
    }
    #[cfg(target_os = "linux")]
    {
        let _ = std::process::Command::new("xdg-open").arg(url).spawn();
    }
}

enum Head {
    Complete {
        method: String,
        target: String,
        head_len: usize,
        content_length: usize,
    },
    Invalid,
    TooLarge,
}

fn parse_head(buf: &[u8]) -> Option<Head> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut req = httparse::Request::new(&mut headers);
    match req.parse(buf) {
        Ok(httparse::Status::Complete(head_len)) => {
            let (Some(method), Some(target)) = (req.method, req.path) else {
                return Some(Head::Invalid);
            };
            let length = req
                .headers
                .iter()
                .find(|h| h.name.eq_ignore_ascii_case("content-length"))
                .map(|h| std::str::from_utf8(h.value).ok().and_then(|v| v.trim().parse::<usize>().ok()));
            let content_length = match length {
                None => 0,
                Some(Some(n)) => n,
                Some(None) => return Some(Head::Invalid),
            };
            Some(Head::Complete {
                method: method.to_string(),
                target: target.to_string(),
                head_len,
                content_length,
            })
        }
        Ok(httparse::Status::Partial) => None,
        Err(_) => Some(Head::Invalid),
    }
}

/// What came off the wire for one connection.
enum Incoming {
    Request { method: String, target: String, body: String },
    Reject(HttpResponse),
    Closed,
}

async fn read_request(stream: &mut TcpStream, max_body: usize) -> std::io::Result<Incoming> {
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 4096];

    let head = loop {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            // Peer closed before sending a full request head.
            return Ok(Incoming::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(head) = parse_head(&buf) {
            break head;
        }
        if buf.len() > MAX_REQUEST_HEAD {
            break Head::TooLarge;
        }
    };

    let (method, target, head_len, content_length) = match head {
        Head::Complete { method, target, head_len, content_length } => {
            (method, target, head_len, content_length)
        }
        Head::Invalid => return Ok(Incoming::Reject(HttpResponse::error(400, "Bad Request"))),
        Head::TooLarge => {
            return Ok(Incoming::Reject(HttpResponse::error(413, "Request head too large")));
        }
    };
    if content_length > max_body {
        let message = format!("Request body exceeds {max_body} bytes");
        return Ok(Incoming::Reject(HttpResponse::error(413, &message)));
    }

    let wanted = head_len + content_length;
    while buf.len() < wanted {
        let n = stream.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Incoming::Closed);
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    let body = String::from_utf8_lossy(&buf[head_len..wanted]).into_owned();
    Ok(Incoming::Request { method, target, body })
}

async fn handle_connection<B: ChatBackend>(
    mut stream: TcpStream,
    state: &AppState<B>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let limits = state.limits;
    let incoming = match tokio::time::timeout(limits.read_timeout, read_request(&mut stream, limits.max_body)).await {
        Ok(read) => read?,
        Err(_) => {
            warn!(timeout_ms = limits.read_timeout.as_millis() as u64, "client did not send a request in time");
            Incoming::Reject(HttpResponse::error(408, "Request Timeout"))
        }
    };

    let response = match incoming {
        Incoming::Request { method, target, body } => {
            debug!(%method, %target, body_len = body.len(), "request");
            let response = route(&method, &target, &body, state).await;
            info!(%method, path = target.split('?').next().unwrap_or(""), status = response.status, "handled");
            response
        }
        Incoming::Reject(response) => {
            info!(status = response.status, "rejected");
            response
        }
        Incoming::Closed => return Ok(()),
    };

    stream.write_all(&response.to_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- url_decode tests --

    #[test]
    fn test_url_decode_basic() {
        assert_eq!(url_decode("hello+world"), "hello world");
        assert_eq!(url_decode("hello%20world"), "hello world");
        assert_eq!(url_decode("a%26b"), "a&b");
        assert_eq!(url_decode("plain"), "plain");
    }

    #[test]
    fn test_url_decode_empty() {
        assert_eq!(url_decode(""), "");
    }

    #[test]
    fn test_url_decode_multibyte_utf8() {
        // "料理" percent-encoded as UTF-8
        assert_eq!(url_decode("%E6%96%99%E7%90%86"), "料理");
    }

    #[test]
    fn test_url_decode_bad_escape_kept_literally() {
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
    }

    #[test]
    fn test_url_decode_encoded_plus_is_plus() {
        assert_eq!(url_decode("1%2B1"), "1+1");
    }

    // -- parse_query tests --

    #[test]
    fn test_parse_query_basic() {
        let params = parse_query("persona=working+engineer&question=what%3F");
        assert_eq!(params.get("persona").map(|s| s.as_str()), Some("working engineer"));
        assert_eq!(params.get("question").map(|s| s.as_str()), Some("what?"));
    }

    #[test]
    fn test_parse_query_empty() {
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn test_parse_query_no_value() {
        let params = parse_query("question=");
        assert_eq!(params.get("question").map(|s| s.as_str()), Some(""));
    }

    // -- page --

    #[test]
    fn test_index_has_one_radio_per_persona() {
        let html = index_html();
        assert!(!html.contains("{{PERSONA_OPTIONS}}"));
        for p in Persona::ALL {
            assert!(html.contains(&format!("value=\"{}\"", p.label())));
        }
        assert_eq!(html.matches("name=\"persona\"").count(), Persona::ALL.len());
        assert_eq!(html.matches(" checked").count(), 1);
    }

    #[test]
    fn test_index_has_both_panels() {
        let html = index_html();
        assert!(html.contains("id=\"answer-panel\""));
        assert!(html.contains("id=\"utility-panel\""));
        assert!(html.contains("Generating answer..."));
    }

    // -- response framing --

    #[test]
    fn test_response_bytes_have_length_and_status() {
        let resp = HttpResponse::text(404, "Not Found");
        let raw = String::from_utf8(resp.to_bytes()).unwrap();
        assert!(raw.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(raw.contains("Content-Length: 9\r\n"));
        assert!(raw.ends_with("\r\n\r\nNot Found"));
    }

    #[test]
    fn test_error_response_is_json() {
        let resp = HttpResponse::error(413, "Request head too large");
        assert_eq!(resp.content_type, "application/json");
        let v: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(v["status"], "error");
        assert_eq!(v["message"], "Request head too large");
    }

    #[test]
    fn test_content_length_counts_bytes_not_chars() {
        let resp = HttpResponse::text(200, "料理");
        let raw = String::from_utf8(resp.to_bytes()).unwrap();
        assert!(raw.contains("Content-Length: 6\r\n"));
    }

    #[test]
    fn test_parse_head_partial_then_complete() {
        assert!(parse_head(b"GET /health HTTP/1.1\r\nHost: x\r\n").is_none());
        match parse_head(b"GET /health HTTP/1.1\r\nHost: x\r\n\r\n") {
            Some(Head::Complete { method, target, head_len, content_length }) => {
                assert_eq!(method, "GET");
                assert_eq!(target, "/health");
                assert_eq!(head_len, 33);
                assert_eq!(content_length, 0);
            }
            _ => panic!("expected a complete head"),
        }
    }

    #[test]
    fn test_parse_head_reads_content_length() {
        let raw = b"POST /api/utility HTTP/1.1\r\nContent-Length: 12\r\n\r\nmode=chars&t";
        match parse_head(raw) {
            Some(Head::Complete { method, head_len, content_length, .. }) => {
                assert_eq!(method, "POST");
                assert_eq!(content_length, 12);
                assert_eq!(&raw[head_len..], b"mode=chars&t");
            }
            _ => panic!("expected a complete head"),
        }
    }

    #[test]
    fn test_parse_head_bad_content_length_is_invalid() {
        let raw = b"POST /api/ask HTTP/1.1\r\nContent-Length: lots\r\n\r\n";
        assert!(matches!(parse_head(raw), Some(Head::Invalid)));
    }

    #[test]
    fn test_parse_head_garbage_is_invalid() {
        assert!(matches!(parse_head(b"\x00\x01 nonsense\r\n\r\n"), Some(Head::Invalid)));
    }

    // -- utility routing --

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_utility_chars_ok() {
        let resp = run_utility(&params(&[("mode", "chars"), ("text", "hello")]));
        assert_eq!(resp.status, 200);
        let v: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(v["result"], "5");
        assert_eq!(v["display"], "Character count: 5");
    }

    #[test]
    fn test_utility_bmi_ignores_text_field() {
        let resp = run_utility(&params(&[
            ("mode", "bmi"),
            ("text", "left over"),
            ("height", "170"),
            ("weight", "65"),
        ]));
        let v: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(v["result"], "22.5");
    }

    #[test]
    fn test_utility_validation_is_422() {
        let resp = run_utility(&params(&[("mode", "bmi"), ("height", "abc"), ("weight", "60")]));
        assert_eq!(resp.status, 422);
        let v: serde_json::Value = serde_json::from_str(&resp.body).unwrap();
        assert_eq!(v["status"], "error");
        assert!(v.get("result").is_none());
    }

    #[test]
    fn test_utility_unknown_mode_is_400() {
        assert_eq!(run_utility(&params(&[("mode", "sqrt")])).status, 400);
        assert_eq!(run_utility(&params(&[])).status, 400);
    }
}
