use std::io::Write;
use std::path::Path;

use colored::Colorize;
use lineage_dag::{independents, is_ancestor, merge_base, CommitNode};
use lineage_merge::{MergeError, MergeOptions, MergeOutcome};
use lineage_repo::{RepoError, Repository};

use crate::cli::*;
use crate::exit::{Code, ExitContext, Failure};

pub type CommandResult = Result<Code, Failure>;

pub fn run_command(cli: Cli, out: &mut dyn Write) -> CommandResult {
    let verbose = cli.verbose;
    match cli.command {
        Command::Init(args) => cmd_init(args, out),
        Command::Commit(args) => cmd_commit(args, verbose, out),
        Command::Merge(args) => cmd_merge(args, verbose, out),
        Command::MergeBase(args) => cmd_merge_base(args, verbose, out),
        Command::Log(args) => cmd_log(args, verbose, out),
    }
}

fn cmd_init(args: InitArgs, out: &mut dyn Write) -> CommandResult {
    let repo = Repository::init(&args.path).map_err(|err| {
        let code = match err {
            RepoError::AlreadyInitialized(_) => Code::Failed,
            _ => Code::Unexpected,
        };
        Failure::new(code, anyhow::Error::new(err).context("could not initialize repository"))
    })?;
    writeln!(
        out,
        "Initialized empty lineage repository in {}",
        repo.meta_dir().display()
    )?;
    Ok(Code::Success)
}

fn cmd_commit(args: CommitArgs, verbose: bool, out: &mut dyn Write) -> CommandResult {
    let repo = open_repository(&args.path)?;
    let id = repo
        .commit_workdir(&args.message)
        .exit_with(Code::Unexpected, || "could not create commit")?;
    let commit = repo
        .commit(&id)
        .exit_with(Code::CommitNotFound, move || format!("could not find commit '{id}'"))?;
    print_commit(out, &commit, verbose)?;
    Ok(Code::Success)
}

fn cmd_merge(args: MergeArgs, verbose: bool, out: &mut dyn Write) -> CommandResult {
    let repo = open_repository(&args.path)?;
    let base = load_revision(&repo, &args.base)?;
    let target = load_revision(&repo, &args.target)?;
    let options = merge_options(&args, repo.merge_options());
    let worktree = repo
        .worktree()
        .exit_with(Code::Unexpected, || "could not read the working directory")?;

    match lineage_merge::merge(repo.store(), &worktree, &base, &target, &options) {
        Ok(MergeOutcome::SameCommit) => {
            writeln!(out, "Already up to date. Both are the same commit.")?;
        }
        Ok(MergeOutcome::AlreadyUpToDate) => writeln!(out, "Already up to date.")?,
        Ok(MergeOutcome::FastForward(next)) => print_commit(out, &next, verbose)?,
        Err(err) => return Err(merge_failure(err)),
    }
    Ok(Code::Success)
}

/// Flags can only switch options on; the repository config sets the floor.
fn merge_options(args: &MergeArgs, preset: MergeOptions) -> MergeOptions {
    let mut options = preset;
    options.fast_forward_only |= args.ff_only;
    options.force_merge_commit |= args.no_ff;
    options.no_commit |= args.no_commit;
    options.allow_unrelated_histories |= args.allow_unrelated_histories;
    if let Some(message) = &args.message {
        options.commit_message = Some(message.clone());
    }
    options
}

fn merge_failure(err: MergeError) -> Failure {
    let (code, message) = match &err {
        MergeError::FastForwardRefused => {
            (Code::NotFound, "not possible to fast-forward, aborting")
        }
        MergeError::NotImplemented(_) => (Code::NotImplemented, "unimplemented feature"),
        MergeError::Traversal(_) => (Code::Traversal, "could not traverse the repository history"),
        _ => (Code::Failed, "merge failed"),
    };
    Failure::new(code, anyhow::Error::new(err).context(message))
}

fn cmd_merge_base(args: MergeBaseArgs, verbose: bool, out: &mut dyn Write) -> CommandResult {
    if !args.independent && args.revs.len() != 2 {
        return Err(Failure::message(
            Code::WrongSyntax,
            format!("expected two revisions, got {}", args.revs.len()),
        ));
    }

    let repo = open_repository(&args.path)?;
    let commits = args
        .revs
        .iter()
        .map(|rev| load_revision(&repo, rev))
        .collect::<Result<Vec<_>, _>>()?;
    let store = repo.store();

    if args.is_ancestor {
        let found = is_ancestor(store, &commits[0], &commits[1]).exit_with(Code::Traversal, || {
            "could not traverse the repository history"
        })?;
        return Ok(if found { Code::Success } else { Code::NotFound });
    }

    let result = if args.independent {
        independents(store, &commits)
    } else {
        merge_base(store, &commits[0], &commits[1])
    }
    .exit_with(Code::Traversal, || "could not traverse the repository history")?;

    if result.is_empty() {
        return Ok(Code::NotFound);
    }
    for commit in &result {
        print_commit(out, commit, verbose)?;
    }
    Ok(Code::Success)
}

fn cmd_log(args: LogArgs, verbose: bool, out: &mut dyn Write) -> CommandResult {
    let repo = open_repository(&args.path)?;
    let start = load_revision(&repo, &args.rev)?;
    let limit = args.limit.filter(|n| *n > 0);
    let commits = repo
        .log(&start, limit)
        .exit_with(Code::Traversal, || "could not traverse the repository history")?;
    for commit in &commits {
        print_commit(out, commit, verbose)?;
    }
    Ok(Code::Success)
}

fn open_repository(path: &Path) -> Result<Repository, Failure> {
    Repository::open(path).map_err(|err| {
        let code = match err {
            RepoError::NotARepository(_) => Code::NotARepository,
            _ => Code::Unexpected,
        };
        Failure::new(code, anyhow::Error::new(err).context("not a lineage repository"))
    })
}

/// Resolve `rev` and load its commit, failing with the matching exit code.
fn load_revision(repo: &Repository, rev: &str) -> Result<CommitNode, Failure> {
    let id = repo
        .resolve(rev)
        .exit_with(Code::BadRevision, || format!("could not parse revision '{rev}'"))?;
    repo.commit(&id)
        .exit_with(Code::CommitNotFound, || format!("could not find commit '{rev}'"))
}

fn print_commit(out: &mut dyn Write, commit: &CommitNode, verbose: bool) -> std::io::Result<()> {
    let id = commit.id();
    if verbose {
        writeln!(
            out,
            "{} {} {}",
            id.short_hex().cyan(),
            id.to_hex().dimmed(),
            commit.summary()
        )
    } else {
        writeln!(out, "{id}")
    }
}
