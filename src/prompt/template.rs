//! Model-family prompt templates
//!
//! Pure rendering: same inputs always produce the same string, no I/O.
//! Every family shares one system instruction block and the assembled
//! high-level context; only the prefix/suffix wrapper differs.

use crate::domain::ModelType;

/// Shared completion-formatting rules, prepended to every prompt variant.
const SYSTEM_RULES: &str = "\
You are a code-completion engine.
- Output raw code text only: no markdown fences, no commentary, no greetings.
- Continue exactly from the insertion point and match the surrounding syntax and style.
- Never repeat text that already appears before the insertion point.
- If no useful completion exists, output nothing at all.";

/// Few-shot hole-filler preamble. The prompt ends with an open completion
/// tag; the backend is expected to stop at the closing tag.
const HOLE_FILLER_PREAMBLE: &str = "\
You are a hole filler. You are given a file with one hole marked {{FILL_HERE}}.
Answer with only the text that replaces the hole, wrapped in a <COMPLETION> tag,
with context-aware indentation. Stop generating at </COMPLETION>.

## EXAMPLE QUERY:
<QUERY>
function sumEvens(lim) {
  var sum = 0;
  for (var i = 0; i < lim; ++i) {
    {{FILL_HERE}}
  }
  return sum;
}
</QUERY>
## CORRECT COMPLETION:
<COMPLETION>if (i % 2 === 0) {
      sum += i;
    }</COMPLETION>";

pub struct PromptArgs<'a> {
    pub prefix: &'a str,
    pub suffix: &'a str,
    pub high_level_context: &'a str,
    pub model: ModelType,
    pub language_id: &'a str,
    pub file_name: &'a str,
}

pub fn render_prompt(args: &PromptArgs<'_>) -> String {
    let mut out = String::from(SYSTEM_RULES);
    out.push_str("\n\n");

    if !args.high_level_context.is_empty() {
        out.push_str("Context from the editor:\n");
        out.push_str(args.high_level_context);
        out.push_str("\n\n");
    }

    out.push_str(&render_body(args));
    out
}

fn render_body(args: &PromptArgs<'_>) -> String {
    let PromptArgs { prefix, suffix, language_id, file_name, .. } = args;
    match args.model {
        ModelType::Starcoder => {
            format!("<fim_prefix>{prefix}<fim_suffix>{suffix}<fim_middle>")
        }
        ModelType::Codellama => {
            format!(" <PRE> {prefix} <SUF>{suffix} <MID>")
        }
        ModelType::Deepseek => {
            format!("<｜fim▁begin｜>{prefix}<｜fim▁hole｜>{suffix}<｜fim▁end｜>")
        }
        ModelType::Instruct => {
            format!(
                "<file_context language=\"{language_id}\" name=\"{file_name}\">\n{prefix}</file_context>\nContinue the file exactly from where the snippet ends. Output only the inserted code."
            )
        }
        ModelType::Holefiller => {
            format!("{HOLE_FILLER_PREAMBLE}\n\n<QUERY>\n{prefix}{{{{FILL_HERE}}}}{suffix}\n</QUERY>\n<COMPLETION>")
        }
    }
}
