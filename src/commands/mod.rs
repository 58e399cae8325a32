/*!
Command handlers for the CLI

This module provides the handlers invoked by the CLI entrypoint:

- `title`    - Generate and persist a conversation title
- `fallback` - Print the deterministic fallback title for some text
- `history`  - List, show, and delete stored conversation titles
*/

pub mod fallback;
pub mod history;
pub mod title;
