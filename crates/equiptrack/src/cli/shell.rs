//! Interactive session over a loaded inventory.
//!
//! One line in, one command out. The shell keeps the form draft; the
//! [`Inventory`] keeps everything else.

use std::io::{BufRead, Write};

use anyhow::Context;
use tracing::{debug, warn};

use crate::confirm::{is_affirmative, AutoConfirm, Confirm};
use crate::error::{Error, Result};
use crate::filter::FilterCriteria;
use crate::inventory::Inventory;
use crate::record::{Field, RecordFields};

use super::render;

const HELP: &str = "\
Comandos:
  list                  muestra la tabla filtrada
  details               alterna entre columnas resumidas y todas
  show <id>             muestra todos los campos de una asignación
  search [texto]        búsqueda libre (vacío la limpia)
  sede [sede]           filtra por sede (vacío la limpia)
  cargo [cargo]         filtra por cargo (vacío lo limpia)
  clear                 limpia todos los filtros
  sites                 lista las sedes conocidas
  new                   abre el formulario para una nueva asignación
  edit <id>             abre el formulario sobre una asignación existente
  set <campo>=<valor>   llena un campo (p. ej. set usuario=jdoe)
  unset <campo>         deja un campo en blanco
  form                  muestra el formulario
  save                  valida y guarda el formulario
  cancel                cierra el formulario sin guardar
  delete <id>           elimina una asignación
  help                  muestra esta ayuda
  quit                  sale de la sesión";

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Asks on the shell's own output and reads the answer from its input.
struct LinePrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<'_, R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if write!(self.output, "{prompt} [s/N] ")
            .and_then(|()| self.output.flush())
            .is_err()
        {
            return false;
        }
        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => is_affirmative(&answer),
            Err(err) => {
                warn!(error = %err, "Could not read confirmation");
                false
            }
        }
    }
}

/// Interactive shell reading commands from `R` and writing to `W`.
#[derive(Debug)]
pub struct Shell<R, W> {
    input: R,
    output: W,
    inventory: Inventory,
    draft: RecordFields,
    form_target: Option<Option<u64>>,
    sites: Vec<String>,
    show_details: bool,
    confirm_deletes: bool,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    /// Create a shell over a loaded inventory.
    pub fn new(inventory: Inventory, input: R, output: W) -> Self {
        Self {
            input,
            output,
            inventory,
            draft: RecordFields::new(),
            form_target: None,
            sites: Vec::new(),
            show_details: false,
            confirm_deletes: true,
        }
    }

    /// Sites listed by `sites` and checked by `sede`.
    #[must_use]
    pub fn with_sites(mut self, sites: Vec<String>) -> Self {
        self.sites = sites;
        self
    }

    /// Start with every column shown.
    #[must_use]
    pub fn with_details(mut self, show_details: bool) -> Self {
        self.show_details = show_details;
        self
    }

    /// Whether `delete` asks before removing.
    #[must_use]
    pub fn with_confirm_deletes(mut self, confirm_deletes: bool) -> Self {
        self.confirm_deletes = confirm_deletes;
        self
    }

    /// The inventory as the session left it.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Consume the shell, returning its output.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run until `quit` or end of input.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be read or written.
    pub fn run(&mut self) -> anyhow::Result<()> {
        writeln!(self.output, "Escriba `help` para ver los comandos.")?;
        loop {
            write!(self.output, "{}", self.prompt())?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read command")?;
            if read == 0 {
                writeln!(self.output)?;
                break;
            }

            match self.execute(line.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(Error::Io(err)) => return Err(err).context("failed to write output"),
                Err(err) => writeln!(self.output, "error: {err}")?,
            }
        }
        Ok(())
    }

    fn prompt(&self) -> String {
        match self.form_target {
            None => "equiptrack> ".to_string(),
            Some(None) => "equiptrack [nuevo]> ".to_string(),
            Some(Some(id)) => format!("equiptrack [editando {id}]> "),
        }
    }

    fn execute(&mut self, line: &str) -> Result<Flow> {
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };
        debug!(command, arg, "Shell command");

        match command {
            "" => {}
            "help" | "?" => writeln!(self.output, "{HELP}")?,
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "list" | "ls" => self.list()?,
            "details" => {
                self.show_details = !self.show_details;
                self.list()?;
            }
            "show" => self.with_id("show", arg, Self::show)?,
            "search" => self.filter(|c| c.text_query = arg.to_string())?,
            "sede" => {
                if !arg.is_empty() && !self.sites.iter().any(|s| s == arg) {
                    writeln!(self.output, "nota: '{arg}' no es una sede conocida")?;
                }
                self.filter(|c| c.site_filter = arg.to_string())?;
            }
            "cargo" => self.filter(|c| c.role_filter = arg.to_string())?,
            "clear" => self.filter(|c| *c = FilterCriteria::new())?,
            "sites" => {
                for site in &self.sites {
                    writeln!(self.output, "  {site}")?;
                }
            }
            "new" => self.new_form()?,
            "edit" => self.with_id("edit", arg, Self::edit)?,
            "set" => self.set(arg)?,
            "unset" => self.unset(arg)?,
            "form" => self.form()?,
            "save" => self.save()?,
            "cancel" => self.cancel()?,
            "delete" | "rm" => self.with_id("delete", arg, Self::delete)?,
            other => writeln!(self.output, "comando desconocido '{other}'; escriba `help`")?,
        }
        Ok(Flow::Continue)
    }

    fn with_id(
        &mut self,
        usage: &str,
        arg: &str,
        action: fn(&mut Self, u64) -> Result<()>,
    ) -> Result<()> {
        match arg.parse::<u64>() {
            Ok(id) => action(self, id),
            Err(_) => {
                writeln!(self.output, "uso: {usage} <id>")?;
                Ok(())
            }
        }
    }

    fn list(&mut self) -> Result<()> {
        let records = self.inventory.filtered_records();
        render::write_view(&mut self.output, self.inventory.stats(), &records, self.show_details)
    }

    fn filter(&mut self, change: impl FnOnce(&mut FilterCriteria)) -> Result<()> {
        let mut criteria = self.inventory.criteria().clone();
        change(&mut criteria);
        self.inventory.on_filter_change(criteria);
        render::write_stats(&mut self.output, self.inventory.stats())
    }

    fn show(&mut self, id: u64) -> Result<()> {
        match self.inventory.records().iter().find(|r| r.id == id) {
            Some(record) => render::write_record(&mut self.output, record),
            None => Err(Error::not_found(id)),
        }
    }

    fn new_form(&mut self) -> Result<()> {
        self.inventory.on_new();
        self.draft = self.inventory.edit_draft();
        self.form_target = Some(None);
        self.form()
    }

    fn edit(&mut self, id: u64) -> Result<()> {
        self.inventory.on_edit_request(id)?;
        self.draft = self.inventory.edit_draft();
        self.form_target = Some(Some(id));
        self.form()
    }

    fn form_is_open(&mut self) -> Result<bool> {
        if self.form_target.is_none() {
            writeln!(self.output, "no hay formulario abierto; use `new` o `edit <id>`")?;
            return Ok(false);
        }
        Ok(true)
    }

    fn set(&mut self, arg: &str) -> Result<()> {
        if !self.form_is_open()? {
            return Ok(());
        }
        let Some((name, value)) = arg.split_once('=') else {
            writeln!(self.output, "uso: set <campo>=<valor>")?;
            return Ok(());
        };
        let field: Field = name.parse()?;
        self.draft.set(field, value.trim());
        Ok(())
    }

    fn unset(&mut self, arg: &str) -> Result<()> {
        if !self.form_is_open()? {
            return Ok(());
        }
        let field: Field = arg.parse()?;
        self.draft.set(field, "");
        Ok(())
    }

    fn form(&mut self) -> Result<()> {
        let title = match self.form_target {
            None => return self.form_is_open().map(|_| ()),
            Some(None) => "Nueva asignación".to_string(),
            Some(Some(id)) => format!("Editar asignación {id}"),
        };
        render::write_form(
            &mut self.output,
            &title,
            &self.draft,
            self.inventory.field_errors(),
        )
    }

    fn save(&mut self) -> Result<()> {
        let Some(target) = self.form_target else {
            return self.form_is_open().map(|_| ());
        };
        match self.inventory.on_save(&self.draft, target) {
            Ok(saved) => {
                self.close_form();
                writeln!(self.output, "Asignación {} guardada", saved.id)?;
                Ok(())
            }
            Err(Error::Validation(errors)) => {
                writeln!(self.output, "Corrija los siguientes campos:")?;
                render::write_field_errors(&mut self.output, &errors)
            }
            Err(err @ Error::NotFound { .. }) => {
                self.close_form();
                writeln!(self.output, "{err}; formulario cerrado")?;
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn cancel(&mut self) -> Result<()> {
        if self.form_target.is_some() {
            self.inventory.on_cancel();
            self.close_form();
            writeln!(self.output, "Formulario cerrado")?;
        }
        Ok(())
    }

    fn delete(&mut self, id: u64) -> Result<()> {
        let deleted = if self.confirm_deletes {
            let mut prompt = LinePrompt {
                input: &mut self.input,
                output: &mut self.output,
            };
            self.inventory.on_delete(id, &mut prompt)?
        } else {
            self.inventory.on_delete(id, &mut AutoConfirm)?
        };

        if !deleted {
            writeln!(self.output, "Eliminación cancelada")?;
            return Ok(());
        }
        if self.form_target == Some(Some(id)) {
            self.close_form();
            writeln!(self.output, "Formulario cerrado: su asignación fue eliminada")?;
        }
        writeln!(self.output, "Asignación {id} eliminada")?;
        Ok(())
    }

    fn close_form(&mut self) {
        self.form_target = None;
        self.draft = RecordFields::new();
    }
}
