//! LaTeX backend. Emits a complete article document that compiles with pdflatex.

use serde::{Deserialize, Serialize};

use crate::export::structure::{paragraphs, LineKind};

/// Preamble parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatexOptions {
    pub font_size_pt: u8,
    /// Any paper option accepted by the article class (`a4paper`, `letterpaper`, ...).
    pub paper: String,
    /// Uniform page margin in inches.
    pub margin_in: f32,
    /// xcolor expression for section headings.
    pub heading_color: String,
}

impl Default for LatexOptions {
    fn default() -> Self {
        Self {
            font_size_pt: 11,
            paper: "a4paper".to_string(),
            margin_in: 0.75,
            heading_color: "blue!70!black".to_string(),
        }
    }
}

/// The fixed document preamble, up to and including `\begin{document}`.
pub fn preamble(options: &LatexOptions) -> String {
    format!(
        r"\documentclass[{size}pt,{paper}]{{article}}
\usepackage[utf8]{{inputenc}}
\usepackage[T1]{{fontenc}}
\usepackage[margin={margin}in]{{geometry}}
\usepackage{{enumitem}}
\usepackage{{xcolor}}
\usepackage{{titlesec}}
\usepackage[scaled]{{helvet}}
\renewcommand{{\familydefault}}{{\sfdefault}}

\titleformat{{\section}}
  {{\Large\bfseries\color{{{color}}}}}
  {{}}
  {{0em}}
  {{}}
  [\titlerule[0.5pt]]

\titleformat{{\subsection}}
  {{\large\bfseries}}
  {{}}
  {{0em}}
  {{}}

\setlength{{\parindent}}{{0pt}}
\setlength{{\parskip}}{{0.5em}}

\begin{{document}}

",
        size = options.font_size_pt,
        paper = options.paper,
        margin = options.margin_in,
        color = options.heading_color,
    )
}

/// Escapes the LaTeX special characters `\ { } $ & # ^ _ ~ %`.
///
/// Single pass, so the braces of an inserted `\textbackslash{}` are never escaped again.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str(r"\textbackslash{}"),
            '{' => out.push_str(r"\{"),
            '}' => out.push_str(r"\}"),
            '$' => out.push_str(r"\$"),
            '&' => out.push_str(r"\&"),
            '#' => out.push_str(r"\#"),
            '^' => out.push_str(r"\textasciicircum{}"),
            '_' => out.push_str(r"\_"),
            '~' => out.push_str(r"\textasciitilde{}"),
            '%' => out.push_str(r"\%"),
            other => out.push(other),
        }
    }
    out
}

/// Converts resume text to a LaTeX document.
///
/// Each paragraph whose first line looks like a header, and which has more
/// lines after it, opens a `\section`. Every list item gets its own one-item
/// `itemize`; every other line becomes a plain paragraph.
pub fn to_latex(text: &str, options: &LatexOptions) -> String {
    let mut latex = preamble(options);

    for paragraph in paragraphs(text) {
        let body = match paragraph.split_first() {
            Some((first, rest)) if first.kind == LineKind::Header && !rest.is_empty() => {
                latex.push_str(r"\section{");
                latex.push_str(&escape_latex(first.text));
                latex.push_str("}\n\n");
                rest
            }
            _ => paragraph.as_slice(),
        };

        for line in body {
            if line.kind == LineKind::ListItem {
                latex.push_str("\\begin{itemize}\n  \\item ");
                latex.push_str(&escape_latex(line.item_text()));
                latex.push_str("\n\\end{itemize}\n\n");
            } else {
                latex.push_str(&escape_latex(line.text));
                latex.push_str("\n\n");
            }
        }
    }

    latex.push_str(r"\end{document}");
    latex
}
