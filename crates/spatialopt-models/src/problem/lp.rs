//! CPLEX LP text export.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use spatialopt_core::Result;
use tracing::info;

use super::{LinearExpr, Problem, Sense};

/// Placeholder variable written for rows without terms, fixed at zero.
const DUMMY: &str = "__dummy";

/// Longest line written before wrapping an expression.
const MAX_LINE: usize = 255;

impl Problem {
    /// Renders the problem in CPLEX LP format.
    ///
    /// Rows keep their names; unnamed rows are written as `_C1`, `_C2`, ...
    /// in order of appearance.
    ///
    /// ```
    /// use spatialopt_models::{Constraint, LinearExpr, Problem, Relation, Sense, VarKey, VarSpec};
    ///
    /// let mut problem = Problem::new("LSCP", Sense::Minimize, "$");
    /// let f1 = VarKey::facility("F", "f1");
    /// problem.add_variable(f1.clone(), VarSpec::binary());
    /// problem.objective.add_term(f1.clone(), 1.0);
    /// problem.add_constraint(Constraint::named(
    ///     "DA",
    ///     LinearExpr::new().with_term(f1, 1.0),
    ///     Relation::Ge,
    ///     1.0,
    /// ));
    ///
    /// let lp = problem.to_lp_string();
    /// assert!(lp.contains("Minimize\n OBJ: F$f1\n"));
    /// assert!(lp.contains(" DA: F$f1 >= 1\n"));
    /// ```
    pub fn to_lp_string(&self) -> String {
        let mut out = String::new();
        let mut needs_dummy = false;

        let _ = writeln!(out, "\\* {} *\\", self.name);
        let _ = writeln!(
            out,
            "{}",
            match self.sense {
                Sense::Minimize => "Minimize",
                Sense::Maximize => "Maximize",
            }
        );
        let objective = self.render_expr(&self.objective, &mut needs_dummy);
        let _ = writeln!(out, " OBJ: {}", objective);

        let _ = writeln!(out, "Subject To");
        let mut unnamed = 0usize;
        for constraint in &self.constraints {
            let name = match &constraint.name {
                Some(name) => name.clone(),
                None => {
                    unnamed += 1;
                    format!("_C{}", unnamed)
                }
            };
            let expr = self.render_expr(&constraint.expr, &mut needs_dummy);
            let _ = writeln!(
                out,
                " {}: {} {} {}",
                name, expr, constraint.relation, constraint.rhs
            );
        }

        let mut bounds = Vec::new();
        let mut binaries = Vec::new();
        let mut generals = Vec::new();
        for (key, spec) in &self.variables {
            let name = self.variable_name(key);
            if spec.is_binary() {
                binaries.push(name);
                continue;
            }
            match spec.upper {
                Some(upper) => bounds.push(format!("{} <= {} <= {}", spec.lower, name, upper)),
                None if spec.lower != 0.0 => bounds.push(format!("{} >= {}", name, spec.lower)),
                None => {}
            }
            if spec.integer {
                generals.push(name);
            }
        }
        if needs_dummy {
            bounds.push(format!("{} = 0", DUMMY));
        }

        if !bounds.is_empty() {
            let _ = writeln!(out, "Bounds");
            for bound in &bounds {
                let _ = writeln!(out, " {}", bound);
            }
        }
        if !binaries.is_empty() {
            let _ = writeln!(out, "Binaries");
            for name in &binaries {
                let _ = writeln!(out, " {}", name);
            }
        }
        if !generals.is_empty() {
            let _ = writeln!(out, "Generals");
            for name in &generals {
                let _ = writeln!(out, " {}", name);
            }
        }
        let _ = writeln!(out, "End");
        out
    }

    /// Writes [`Problem::to_lp_string`] to `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be written.
    pub fn write_lp(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_lp_string())?;
        info!(
            event = "model_exported",
            problem = %self.name,
            path = %path.display(),
        );
        Ok(())
    }

    fn render_expr(&self, expr: &LinearExpr, needs_dummy: &mut bool) -> String {
        let mut out = String::new();
        let mut line_len = 0usize;
        for (key, coefficient) in expr.terms().filter(|(_, c)| *c != 0.0) {
            let name = self.variable_name(key);
            let term = match (out.is_empty(), coefficient) {
                (true, c) if c == 1.0 => name,
                (true, c) if c == -1.0 => format!("- {}", name),
                (true, c) => format!("{} {}", c, name),
                (false, c) if c == 1.0 => format!("+ {}", name),
                (false, c) if c == -1.0 => format!("- {}", name),
                (false, c) if c < 0.0 => format!("- {} {}", -c, name),
                (false, c) => format!("+ {} {}", c, name),
            };
            if !out.is_empty() {
                if line_len + term.len() > MAX_LINE {
                    out.push_str("\n ");
                    line_len = 0;
                } else {
                    out.push(' ');
                }
            }
            line_len += term.len() + 1;
            out.push_str(&term);
        }
        if out.is_empty() {
            *needs_dummy = true;
            out = format!("0 {}", DUMMY);
        }
        out
    }
}
