//! Document instrumentor.
//!
//! Produces an augmented copy of a document that, when rendered in an
//! isolated context, becomes interactively editable without the host
//! having any direct access to its internal structure. The augmentation
//! is a single appended behavior block; every other byte of the input is
//! preserved.

use rand::Rng;

/// Class marking the currently selected node inside the preview.
/// Transient: stripped from every outbound payload so the host never sees
/// it as real state.
pub const MARKER_CLASS: &str = "sw-highlight";

/// Prefix of identities minted for nodes that lack an `id` attribute.
pub const IDENTITY_PREFIX: &str = "sw-";

/// Attribute identifying the injected behavior block, so serialization
/// can strip it back out of the document.
pub const AGENT_ATTR: &str = "data-sw-agent";

/// Number of random characters in a minted identity.
const IDENTITY_LEN: usize = 9;

const IDENTITY_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// The editing agent injected into the preview document.
///
/// Inside a real browser embedding this script provides the full editing
/// behavior: capture-phase primary-press selection, marker management,
/// lazy identity minting, navigation suppression, `UPDATE_ELEMENT`
/// application, and clone-based serialization for `HTML_UPDATED` with
/// the marker class and the agent block itself stripped out.
const AGENT_SCRIPT: &str = r#"
<script data-sw-agent="true">
(function () {
  var MARKER = 'sw-highlight';

  var style = document.createElement('style');
  style.innerHTML = '.' + MARKER + ' { outline: 2px solid #3b82f6 !important; cursor: pointer !important; }';
  document.head.appendChild(style);

  function stripMarker(classes) {
    return classes.split(/\s+/).filter(function (c) {
      return c && c !== MARKER;
    }).join(' ');
  }

  function cleanSerialize() {
    var clone = document.documentElement.cloneNode(true);
    clone.querySelectorAll('.' + MARKER).forEach(function (el) {
      el.classList.remove(MARKER);
      if (!el.getAttribute('class')) el.removeAttribute('class');
    });
    clone.querySelectorAll('script[data-sw-agent]').forEach(function (el) {
      el.remove();
    });
    return clone.outerHTML;
  }

  document.addEventListener('mousedown', function (e) {
    if (e.button !== 0) return;
    e.preventDefault();
    e.stopPropagation();

    var target = e.target;
    document.querySelectorAll('.' + MARKER).forEach(function (el) {
      el.classList.remove(MARKER);
    });
    target.classList.add(MARKER);

    var identity = target.id;
    if (!identity) {
      identity = 'sw-' + Math.random().toString(36).substr(2, 9);
      target.id = identity;
    }

    window.parent.postMessage({
      type: 'ELEMENT_SELECTED',
      payload: {
        identity: identity,
        tagName: target.tagName.toLowerCase(),
        text: (target.innerText || '').substring(0, 50),
        classes: stripMarker(target.className || '')
      }
    }, '*');
  }, true);

  document.addEventListener('click', function (e) {
    e.preventDefault();
    e.stopPropagation();
  }, true);

  window.addEventListener('message', function (e) {
    var data = e.data || {};
    if (data.type !== 'UPDATE_ELEMENT') return;
    var payload = data.payload || {};
    var el = document.getElementById(payload.identity);
    if (!el) return;
    if (payload.text !== undefined && payload.text !== null) {
      el.innerText = payload.text;
    }
    if (payload.classes !== undefined && payload.classes !== null) {
      var clean = stripMarker(payload.classes);
      el.className = clean ? clean + ' ' + MARKER : MARKER;
    }
    window.parent.postMessage({ type: 'HTML_UPDATED', payload: cleanSerialize() }, '*');
  });
})();
</script>
"#;

/// Appends the editing behavior to a document.
///
/// The block lands immediately before the closing body tag if present,
/// else before the closing document tag, else at the end. No other byte
/// of the input is altered.
pub fn instrument(document: &str) -> String {
    if let Some(idx) = document.find("</body>") {
        let mut out = String::with_capacity(document.len() + AGENT_SCRIPT.len());
        out.push_str(&document[..idx]);
        out.push_str(AGENT_SCRIPT);
        out.push_str(&document[idx..]);
        out
    } else if let Some(idx) = document.find("</html>") {
        let mut out = String::with_capacity(document.len() + AGENT_SCRIPT.len());
        out.push_str(&document[..idx]);
        out.push_str(AGENT_SCRIPT);
        out.push_str(&document[idx..]);
        out
    } else {
        let mut out = String::with_capacity(document.len() + AGENT_SCRIPT.len());
        out.push_str(document);
        out.push_str(AGENT_SCRIPT);
        out
    }
}

/// Mints a fresh element identity: `sw-` followed by nine `[a-z0-9]`
/// characters.
pub fn mint_identity() -> String {
    format!("{IDENTITY_PREFIX}{}", random_token(IDENTITY_LEN))
}

/// Produces `len` random `[a-z0-9]` characters.
pub fn random_token(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| IDENTITY_ALPHABET[rng.gen_range(0..IDENTITY_ALPHABET.len())] as char)
        .collect()
}

/// Removes the selection marker token from a class string.
pub fn strip_marker(classes: &str) -> String {
    classes
        .split_whitespace()
        .filter(|token| *token != MARKER_CLASS)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalizes a class string and re-appends the selection marker, so an
/// edited node stays visibly selected.
pub fn classes_with_marker(classes: &str) -> String {
    let clean = strip_marker(classes);
    if clean.is_empty() {
        MARKER_CLASS.to_string()
    } else {
        format!("{clean} {MARKER_CLASS}")
    }
}
