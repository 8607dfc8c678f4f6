//! Line-preserving TypeScript type erasure.
//!
//! Turns TypeScript source into directly executable JavaScript by erasing
//! type-only syntax, without touching runtime statements or their order.
//! Newlines inside erased spans are kept, so output line numbers match the
//! input exactly.
//!
//! Covered surface (the constructs browser-side sources actually use):
//! - `: Type` annotations on variable declarations, parameters and return
//!   positions, including generics, unions, array/object/function types
//! - `as` / `satisfies` assertions
//! - optional-parameter markers (`x?: T`) and non-null assertions (`x!`)
//! - `import type` / `export type` statements and `type` specifiers inside
//!   import braces
//! - `interface` and `type` alias declarations
//! - generic parameter lists on `function` declarations
//!
//! Strings, template literals and comments pass through untouched. This is
//! purely syntactic erasure; nothing is executed or type-checked.

/// Strip type-only syntax from `src`, preserving line positions.
#[must_use]
pub fn strip_types(src: &str) -> String {
    Stripper::new(src).run()
}

/// Previous significant token, tracked for context-sensitive decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prev {
    Start,
    /// Identifier or non-keyword word
    Word,
    /// Reserved word that cannot end an expression
    Keyword,
    Sym(u8),
    /// Closing quote of a string or template literal
    StrEnd,
}

/// Open bracket frame
struct Frame {
    bracket: u8,
    /// Pending ternary `?` tokens at this nesting level
    ternary: u32,
    /// Inside a `const`/`let`/`var` declaration head (before `=`)
    decl: bool,
}

/// Words that cannot directly precede an `as` cast or non-null assertion
const KEYWORDS: &[&str] = &[
    "await", "case", "class", "const", "default", "delete", "do", "else", "export", "extends",
    "for", "from", "function", "if", "import", "in", "instanceof", "let", "new", "of", "return",
    "switch", "throw", "typeof", "var", "void", "while", "yield",
];

const TYPE_PREFIX_WORDS: &[&str] = &["keyof", "typeof", "readonly", "infer", "new"];

struct Stripper<'a> {
    src: &'a [u8],
    out: Vec<u8>,
    /// Start of the pending span not yet copied to `out`
    copy_from: usize,
    i: usize,
    frames: Vec<Frame>,
    prev: Prev,
    last_word: Option<(usize, usize)>,
    word_before: Option<(usize, usize)>,
}

impl<'a> Stripper<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src: src.as_bytes(),
            out: Vec::with_capacity(src.len()),
            copy_from: 0,
            i: 0,
            frames: vec![Frame {
                bracket: 0,
                ternary: 0,
                decl: false,
            }],
            prev: Prev::Start,
            last_word: None,
            word_before: None,
        }
    }

    fn run(mut self) -> String {
        while self.i < self.src.len() {
            let c = self.src[self.i];
            match c {
                b'/' if self.peek(1) == Some(b'/') => self.skip_line_comment(),
                b'/' if self.peek(1) == Some(b'*') => self.skip_block_comment(),
                b'\'' | b'"' => {
                    self.i = self.skip_string(self.i);
                    self.prev = Prev::StrEnd;
                }
                b'`' => {
                    self.i = self.skip_template(self.i);
                    self.prev = Prev::StrEnd;
                }
                b'(' | b'[' | b'{' => {
                    self.frames.push(Frame {
                        bracket: c,
                        ternary: 0,
                        decl: false,
                    });
                    self.sym(c);
                }
                b')' | b']' | b'}' => {
                    if self.frames.len() > 1 {
                        self.frames.pop();
                    }
                    self.sym(c);
                }
                b'?' => self.handle_question(),
                b':' => self.handle_colon(),
                b'!' => self.handle_bang(),
                b'<' => self.handle_angle(),
                b'=' if self.peek(1) == Some(b'>') => {
                    self.prev = Prev::Sym(b'>');
                    self.i += 2;
                }
                b'=' => {
                    self.frame_mut().decl = false;
                    self.sym(c);
                }
                b';' => {
                    self.frame_mut().decl = false;
                    self.sym(c);
                }
                c if is_ident_start(c) => self.handle_word(),
                c => {
                    if !c.is_ascii_whitespace() {
                        self.prev = Prev::Sym(c);
                    }
                    self.i += 1;
                }
            }
        }
        self.out.extend_from_slice(&self.src[self.copy_from..]);
        String::from_utf8_lossy(&self.out).into_owned()
    }

    // ---- token handlers ----

    fn handle_word(&mut self) {
        let src = self.src;
        let start = self.i;
        let end = self.word_end(start);
        let word = &src[start..end];

        match word {
            b"import" if self.at_statement_pos() => {
                self.handle_import(start, end);
                return;
            }
            b"export" if self.at_statement_pos() => {
                if let Some((_, next)) = self.word_at(self.skip_ws(end)) {
                    match next {
                        b"type" => {
                            self.erase_statement(start);
                            return;
                        }
                        b"interface" => {
                            self.erase_interface(start);
                            return;
                        }
                        _ => {}
                    }
                }
            }
            b"interface" if self.at_statement_pos() => {
                self.erase_interface(start);
                return;
            }
            b"type" if self.at_statement_pos() && self.is_type_alias(end) => {
                self.erase_type_alias(start);
                return;
            }
            b"as" | b"satisfies" if self.can_precede_cast() => {
                // Swallow the space before the keyword too
                let from = self.ws_run_start(start);
                let to = self.consume_type(end);
                self.erase(from, to);
                return;
            }
            b"const" | b"let" | b"var" => self.frame_mut().decl = true,
            _ => {}
        }

        self.word_before = self.last_word;
        self.last_word = Some((start, end));
        self.prev = if KEYWORDS.contains(&word_str(word)) {
            Prev::Keyword
        } else {
            Prev::Word
        };
        self.i = end;
    }

    fn handle_question(&mut self) {
        match self.peek(1) {
            Some(b'.' | b'?') => {
                self.prev = Prev::Sym(b'?');
                self.i += 2;
            }
            _ => {
                let next = self.src.get(self.skip_ws(self.i + 1)).copied();
                if matches!(next, Some(b':' | b')' | b',')) && self.prev == Prev::Word {
                    // Optional marker; the annotation (if any) is erased when
                    // the colon is reached
                    self.erase(self.i, self.i + 1);
                } else {
                    self.frame_mut().ternary += 1;
                    self.sym(b'?');
                }
            }
        }
    }

    fn handle_colon(&mut self) {
        if self.frame().ternary > 0 {
            self.frame_mut().ternary -= 1;
            self.sym(b':');
            return;
        }
        let annotated = match self.prev {
            // Return type after a parameter list
            Prev::Sym(b')') => true,
            // Identifier or destructuring pattern: a parameter inside parens,
            // or a declaration head. Object literal keys, labels and case
            // arms fall through and keep their colon.
            Prev::Word | Prev::Sym(b'}' | b']') => {
                self.frame().bracket == b'(' || self.frame().decl
            }
            _ => false,
        };
        if annotated {
            let to = self.consume_type(self.i + 1);
            self.erase(self.i, to);
        } else {
            self.sym(b':');
        }
    }

    fn handle_bang(&mut self) {
        let assertion = self.peek(1) != Some(b'=')
            && matches!(self.prev, Prev::Word | Prev::Sym(b')' | b']') | Prev::StrEnd);
        if assertion {
            self.erase(self.i, self.i + 1);
        } else {
            self.sym(b'!');
        }
    }

    fn handle_angle(&mut self) {
        // Generic parameter list on a function declaration
        if self.prev == Prev::Word
            && self
                .word_before
                .is_some_and(|(s, e)| &self.src[s..e] == b"function")
        {
            let to = self.consume_angles(self.i);
            self.erase(self.i, to);
        } else {
            self.sym(b'<');
        }
    }

    /// Process an `import` statement: erase it wholly when type-only,
    /// otherwise drop `type X` specifiers inside the named-import braces.
    fn handle_import(&mut self, start: usize, end: usize) {
        if let Some((_, next)) = self.word_at(self.skip_ws(end)) {
            if next == b"type" {
                self.erase_statement(start);
                return;
            }
        }
        self.word_before = self.last_word;
        self.last_word = Some((start, end));
        self.prev = Prev::Keyword;
        self.i = end;

        let stmt_end = self.statement_end(end);
        let Some(brace) = self.find_byte(end, stmt_end, b'{') else {
            return;
        };

        // Walk the named-import clause, erasing type-only specifiers
        let mut j = brace + 1;
        let mut last_comma: Option<usize> = None;
        while j < stmt_end && self.src[j] != b'}' {
            if self.src[j] == b',' {
                last_comma = Some(j);
                j += 1;
                continue;
            }
            if self.src[j].is_ascii_whitespace() {
                j += 1;
                continue;
            }
            let Some((spec_start, w)) = self.word_at(j) else {
                j += 1;
                continue;
            };
            let mut k = spec_start + w.len();
            if w == b"type" {
                let after = self.skip_ws(k);
                if let Some((_, name)) = self.word_at(after) {
                    if name != b"as" {
                        // `type Name` or `type Name as Alias`
                        k = after + name.len();
                        let maybe_as = self.skip_ws(k);
                        if let Some((as_pos, kw)) = self.word_at(maybe_as) {
                            if kw == b"as" {
                                let alias_pos = self.skip_ws(as_pos + 2);
                                if let Some((_, alias)) = self.word_at(alias_pos) {
                                    k = alias_pos + alias.len();
                                }
                            }
                        }
                        // Take one adjacent comma with the specifier
                        let trailing = self.skip_ws(k);
                        let (from, to) = if self.src.get(trailing) == Some(&b',') {
                            let mut past = trailing + 1;
                            while matches!(self.src.get(past), Some(b' ' | b'\t')) {
                                past += 1;
                            }
                            (spec_start, past)
                        } else if let Some(c) = last_comma {
                            (c, k)
                        } else {
                            (spec_start, k)
                        };
                        self.erase(from, to);
                        j = to;
                        continue;
                    }
                }
            }
            // Value specifier, possibly `Name as Alias`; skip it
            let maybe_as = self.skip_ws(k);
            if let Some((as_pos, kw)) = self.word_at(maybe_as) {
                if kw == b"as" {
                    let alias_pos = self.skip_ws(as_pos + 2);
                    if let Some((_, alias)) = self.word_at(alias_pos) {
                        k = alias_pos + alias.len();
                    }
                }
            }
            j = k;
        }
        // Resume scanning at the closing brace so the clause is not
        // re-tokenized (an `as` alias inside it is not a cast)
        self.i = j.max(self.i);
    }

    // ---- erasure helpers ----

    /// Flush pending text up to `from`, then replace `[from, to)` with its
    /// newlines only.
    fn erase(&mut self, from: usize, to: usize) {
        debug_assert!(from >= self.copy_from);
        self.out.extend_from_slice(&self.src[self.copy_from..from]);
        for &b in &self.src[from..to] {
            if b == b'\n' {
                self.out.push(b'\n');
            }
        }
        self.copy_from = to;
        self.i = to;
    }

    fn erase_statement(&mut self, start: usize) {
        let end = self.statement_end(start);
        self.erase(start, end);
    }

    fn erase_type_alias(&mut self, start: usize) {
        // Through the terminating `;` at bracket depth zero; `;` may appear
        // inside an object type literal
        let mut j = start;
        let mut depth = 0u32;
        while j < self.src.len() {
            match self.src[j] {
                b'{' | b'(' | b'[' => depth += 1,
                b'}' | b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => {
                    j += 1;
                    break;
                }
                b'\'' | b'"' | b'`' => {
                    j = self.skip_string_at(j);
                    continue;
                }
                _ => {}
            }
            j += 1;
        }
        self.erase(start, j);
    }

    fn erase_interface(&mut self, start: usize) {
        // Skip to the body, then through its matching close brace
        let mut j = start;
        while j < self.src.len() && self.src[j] != b'{' {
            match self.src[j] {
                b'\'' | b'"' | b'`' => j = self.skip_string_at(j),
                _ => j += 1,
            }
        }
        let mut depth = 0u32;
        while j < self.src.len() {
            match self.src[j] {
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        j += 1;
                        break;
                    }
                }
                b'\'' | b'"' | b'`' => {
                    j = self.skip_string_at(j);
                    continue;
                }
                _ => {}
            }
            j += 1;
        }
        self.erase(start, j);
    }

    // ---- type expression scanning ----

    /// Consume a type expression starting at `from`, returning the index
    /// just past it.
    fn consume_type(&self, from: usize) -> usize {
        let mut i = from;
        loop {
            i = self.skip_ws(i);
            // Prefix operators
            while let Some((s, w)) = self.word_at(i) {
                if TYPE_PREFIX_WORDS.contains(&word_str(w)) {
                    i = self.skip_ws(s + w.len());
                } else {
                    break;
                }
            }
            let mut paren_primary = false;
            match self.src.get(i) {
                Some(b'(') => {
                    i = self.consume_balanced(i);
                    paren_primary = true;
                }
                Some(b'{' | b'[') => i = self.consume_balanced(i),
                Some(b'\'' | b'"' | b'`') => i = self.skip_string_at(i),
                Some(c) if c.is_ascii_digit() || *c == b'-' => {
                    i += 1;
                    while self
                        .src
                        .get(i)
                        .is_some_and(|c| c.is_ascii_digit() || *c == b'.' || *c == b'_')
                    {
                        i += 1;
                    }
                }
                Some(c) if is_ident_start(*c) => {
                    i = self.word_end(i);
                    // Qualified names: A.B.C
                    while self.src.get(i) == Some(&b'.')
                        && self.src.get(i + 1).is_some_and(|c| is_ident_start(*c))
                    {
                        i = self.word_end(i + 1);
                    }
                    if self.src.get(i) == Some(&b'<') {
                        i = self.consume_angles(i);
                    }
                }
                _ => return i,
            }
            // Array suffixes bind tightly (no whitespace before `[`)
            while self.src.get(i) == Some(&b'[') {
                i = self.consume_balanced(i);
            }
            let j = self.skip_ws(i);
            match self.src.get(j) {
                Some(b'|') if self.src.get(j + 1) != Some(&b'|') => i = j + 1,
                Some(b'&') if self.src.get(j + 1) != Some(&b'&') => i = j + 1,
                Some(b'=') if self.src.get(j + 1) == Some(&b'>') && paren_primary => i = j + 2,
                _ => return i,
            }
        }
    }

    /// Consume a balanced `<...>` group, treating `=>` as a unit so function
    /// types inside generics do not unbalance the count.
    fn consume_angles(&self, from: usize) -> usize {
        let mut depth = 0u32;
        let mut i = from;
        while i < self.src.len() {
            match self.src[i] {
                b'<' => depth += 1,
                b'>' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                b'=' if self.src.get(i + 1) == Some(&b'>') => i += 1,
                b'\'' | b'"' | b'`' => {
                    i = self.skip_string_at(i);
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        i
    }

    /// Consume a balanced bracket group opened at `from`
    fn consume_balanced(&self, from: usize) -> usize {
        let mut depth = 0u32;
        let mut i = from;
        while i < self.src.len() {
            match self.src[i] {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return i + 1;
                    }
                }
                b'\'' | b'"' | b'`' => {
                    i = self.skip_string_at(i);
                    continue;
                }
                _ => {}
            }
            i += 1;
        }
        i
    }

    // ---- scanning primitives ----

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.src.get(self.i + ahead).copied()
    }

    fn sym(&mut self, c: u8) {
        self.prev = Prev::Sym(c);
        self.i += 1;
    }

    fn frame(&self) -> &Frame {
        self.frames.last().unwrap_or(&self.frames[0])
    }

    fn frame_mut(&mut self) -> &mut Frame {
        let idx = self.frames.len() - 1;
        &mut self.frames[idx]
    }

    fn at_statement_pos(&self) -> bool {
        matches!(self.prev, Prev::Start | Prev::Sym(b';' | b'{' | b'}'))
    }

    fn can_precede_cast(&self) -> bool {
        matches!(self.prev, Prev::Word | Prev::Sym(b')' | b']') | Prev::StrEnd)
    }

    /// True if `type` at a statement position introduces an alias:
    /// `type Name =` or `type Name<...> =`
    fn is_type_alias(&self, after_kw: usize) -> bool {
        let p = self.skip_ws(after_kw);
        let Some((s, name)) = self.word_at(p) else {
            return false;
        };
        let mut q = s + name.len();
        if self.src.get(q) == Some(&b'<') {
            q = self.consume_angles(q);
        }
        self.src.get(self.skip_ws(q)) == Some(&b'=')
    }

    fn word_end(&self, start: usize) -> usize {
        let mut i = start;
        while self.src.get(i).is_some_and(|c| is_ident_char(*c)) {
            i += 1;
        }
        i
    }

    fn word_at(&self, pos: usize) -> Option<(usize, &'a [u8])> {
        let src = self.src;
        let c = *src.get(pos)?;
        if is_ident_start(c) {
            Some((pos, &src[pos..self.word_end(pos)]))
        } else {
            None
        }
    }

    fn skip_ws(&self, mut i: usize) -> usize {
        while self.src.get(i).is_some_and(u8::is_ascii_whitespace) {
            i += 1;
        }
        i
    }

    /// Start of the horizontal whitespace run ending at `pos`
    fn ws_run_start(&self, pos: usize) -> usize {
        let mut i = pos;
        while i > self.copy_from && matches!(self.src[i - 1], b' ' | b'\t') {
            i -= 1;
        }
        i
    }

    fn find_byte(&self, from: usize, to: usize, target: u8) -> Option<usize> {
        (from..to.min(self.src.len())).find(|&k| self.src[k] == target)
    }

    /// End of the statement starting before `from`: past the `;` at bracket
    /// depth zero, or at the newline that ends an unterminated statement.
    fn statement_end(&self, from: usize) -> usize {
        let mut depth = 0u32;
        let mut j = from;
        while j < self.src.len() {
            match self.src[j] {
                b'{' | b'(' | b'[' => depth += 1,
                b'}' | b')' | b']' => depth = depth.saturating_sub(1),
                b';' if depth == 0 => return j + 1,
                b'\n' if depth == 0 => return j,
                b'\'' | b'"' | b'`' => {
                    j = self.skip_string_at(j);
                    continue;
                }
                _ => {}
            }
            j += 1;
        }
        j
    }

    fn skip_line_comment(&mut self) {
        while self.i < self.src.len() && self.src[self.i] != b'\n' {
            self.i += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.i += 2;
        while self.i < self.src.len() {
            if self.src[self.i] == b'*' && self.peek(1) == Some(b'/') {
                self.i += 2;
                return;
            }
            self.i += 1;
        }
    }

    /// Skip a string or template literal starting at `at`
    fn skip_string_at(&self, at: usize) -> usize {
        match self.src[at] {
            b'`' => self.skip_template(at),
            q => self.skip_string_quoted(at, q),
        }
    }

    fn skip_string(&self, at: usize) -> usize {
        self.skip_string_quoted(at, self.src[at])
    }

    fn skip_string_quoted(&self, at: usize, quote: u8) -> usize {
        let mut i = at + 1;
        while i < self.src.len() {
            match self.src[i] {
                b'\\' => i += 2,
                c if c == quote => return i + 1,
                _ => i += 1,
            }
        }
        i
    }

    fn skip_template(&self, at: usize) -> usize {
        let mut i = at + 1;
        while i < self.src.len() {
            match self.src[i] {
                b'\\' => i += 2,
                b'`' => return i + 1,
                b'$' if self.src.get(i + 1) == Some(&b'{') => {
                    i = self.consume_balanced(i + 1);
                }
                _ => i += 1,
            }
        }
        i
    }
}

const fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_' || c == b'$' || c >= 0x80
}

const fn is_ident_char(c: u8) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

fn word_str(w: &[u8]) -> &str {
    std::str::from_utf8(w).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_annotation() {
        assert_eq!(strip_types("const x: number = 1;"), "const x = 1;");
        assert_eq!(strip_types("let s: string | null = null;"), "let s = null;");
    }

    #[test]
    fn parameter_and_return_annotations() {
        assert_eq!(
            strip_types("function add(a: number, b: number): number { return a + b; }"),
            "function add(a, b) { return a + b; }"
        );
        assert_eq!(
            strip_types("async function get(): Promise<APIResponse> { return f(); }"),
            "async function get() { return f(); }"
        );
    }

    #[test]
    fn arrow_parameter_annotation() {
        assert_eq!(
            strip_types("addEventListener('click', (e: Event) => handle(e));"),
            "addEventListener('click', (e) => handle(e));"
        );
    }

    #[test]
    fn as_casts() {
        assert_eq!(
            strip_types("(document.querySelector('#x') as HTMLElement).style.display = '';"),
            "(document.querySelector('#x')).style.display = '';"
        );
        assert_eq!(strip_types("const n = v as number;"), "const n = v;");
    }

    #[test]
    fn import_star_as_is_untouched() {
        assert_eq!(
            strip_types("import * as path from './path.ts';"),
            "import * as path from './path.ts';"
        );
    }

    #[test]
    fn type_only_import_is_erased() {
        assert_eq!(
            strip_types("import type { APIRequest } from '../common/types.ts';\nrun();"),
            "\nrun();"
        );
    }

    #[test]
    fn inline_type_specifier_is_dropped() {
        assert_eq!(
            strip_types("import { type A, b } from './m.ts';"),
            "import { b } from './m.ts';"
        );
        assert_eq!(
            strip_types("import { a, type B } from './m.ts';"),
            "import { a } from './m.ts';"
        );
    }

    #[test]
    fn interface_and_alias_are_erased_with_lines_kept() {
        let src = "interface Point {\n  x: number;\n  y: number;\n}\nconst p = make();\n";
        assert_eq!(strip_types(src), "\n\n\n\nconst p = make();\n");
        assert_eq!(strip_types("type Id = string;\nuse(id);"), "\nuse(id);");
    }

    #[test]
    fn line_count_is_preserved() {
        let src = "import type { T } from './t.ts';\nconst a: number = 1;\ninterface I {\n  z: T;\n}\nconsole.log(a);\n";
        let out = strip_types(src);
        assert_eq!(src.lines().count(), out.lines().count());
        assert!(out.contains("const a = 1;"));
        assert!(out.contains("console.log(a);"));
    }

    #[test]
    fn object_literals_and_ternaries_keep_colons() {
        assert_eq!(
            strip_types("const o = { a: 1, b: 'x:y' };"),
            "const o = { a: 1, b: 'x:y' };"
        );
        assert_eq!(strip_types("const r = c ? a : b;"), "const r = c ? a : b;");
        assert_eq!(
            strip_types("switch (k) { case 1: break; default: break; }"),
            "switch (k) { case 1: break; default: break; }"
        );
    }

    #[test]
    fn optional_parameter_marker() {
        assert_eq!(
            strip_types("function f(a?: string) { return a; }"),
            "function f(a) { return a; }"
        );
    }

    #[test]
    fn non_null_assertion() {
        assert_eq!(strip_types("const v = el!.value;"), "const v = el.value;");
        assert_eq!(strip_types("if (a !== b) { run(!ok); }"), "if (a !== b) { run(!ok); }");
    }

    #[test]
    fn generic_function_declaration() {
        assert_eq!(
            strip_types("function id<T>(v: T): T { return v; }"),
            "function id(v) { return v; }"
        );
    }

    #[test]
    fn destructured_declaration_annotation() {
        assert_eq!(
            strip_types("const { a, b }: Pair = load();"),
            "const { a, b } = load();"
        );
    }

    #[test]
    fn strings_and_comments_untouched() {
        let src = "// note: keep this\nconst s = \"a: b\"; /* x: y */\nconst t = `v: ${n}`;\n";
        assert_eq!(strip_types(src), src);
    }

    #[test]
    fn function_type_annotation() {
        assert_eq!(
            strip_types("const f: (a: number) => void = (a) => {};"),
            "const f = (a) => {};"
        );
    }

    #[test]
    fn idempotent_on_plain_javascript() {
        let src = "const x = 1;\nfunction f(a, b) { return a ? b : x; }\nexport { f };\n";
        assert_eq!(strip_types(src), src);
    }
}
