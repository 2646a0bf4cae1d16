//! End-to-end runs of the harness in pty mode.

#[cfg(unix)]
mod common;

#[cfg(unix)]
mod pty {
    use stagehand::{run, ChildSpec, LaunchMode, PassiveAutomaton};

    use super::common::Recorder;

    fn sh(script: &str) -> ChildSpec {
        ChildSpec::new("sh").args(["-c", script])
    }

    #[test]
    fn clean_exit_returns_zero() {
        let exit = run(&sh("exit 0"), Box::new(PassiveAutomaton), LaunchMode::Pty).unwrap();
        assert_eq!(exit, 0);
    }

    #[test]
    fn nonzero_exit_is_reported_without_error() {
        let exit = run(&sh("exit 9"), Box::new(PassiveAutomaton), LaunchMode::Pty).unwrap();
        assert_eq!(exit, 9);
    }

    #[test]
    fn signal_death_reports_128_plus_signal() {
        let exit = run(
            &sh("kill -TERM $$"),
            Box::new(PassiveAutomaton),
            LaunchMode::Pty,
        )
        .unwrap();
        assert_eq!(exit, 128 + libc::SIGTERM);
    }

    #[test]
    fn missing_program_is_a_setup_error() {
        let spec = ChildSpec::new("/nonexistent/not-a-binary");
        let err = run(&spec, Box::new(PassiveAutomaton), LaunchMode::Pty).unwrap_err();
        assert!(err.to_string().contains("pseudo-terminal"), "{err}");
    }

    #[test]
    fn stdout_and_stderr_merge_onto_one_bus() {
        let (recorder, seen) = Recorder::new();
        let exit = run(
            &sh("echo from-stdout; echo from-stderr >&2"),
            Box::new(recorder),
            LaunchMode::Pty,
        )
        .unwrap();
        assert_eq!(exit, 0);

        // Both streams arrive through the single pty master, framed the
        // same way with no way to tell them apart.
        let seen = seen.lock().unwrap();
        assert!(seen.contains(&"from-stdout".to_string()), "{seen:?}");
        assert!(seen.contains(&"from-stderr".to_string()), "{seen:?}");
    }

    #[test]
    fn automaton_command_reaches_the_pty() {
        let (recorder, seen) = Recorder::new();
        let recorder = recorder.reply("READY", "GO");
        // stty -echo keeps the terminal from feeding our own command
        // back through the framer.
        let exit = run(
            &sh(r#"stty -echo; echo READY; read line; [ "$line" = GO ] && exit 0; exit 3"#),
            Box::new(recorder),
            LaunchMode::Pty,
        )
        .unwrap();
        assert_eq!(exit, 0, "child must have received GO");
        assert!(seen.lock().unwrap().contains(&"READY".to_string()));
    }
}
