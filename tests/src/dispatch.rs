/// Double dispatch over every node kind.
///
/// `Phrase::accept` must call exactly the one visitor method matching the
/// node's kind, call it once, and hand back its result unchanged.
mod dispatch_tests {
    use std::rc::Rc;

    use nepo_ast::{
        nodes::{
            AssignStmt, Binary, BinaryOp, BlocklyType, BoolConst, BrickLedColor, Flow, IfStmt,
            KeySensor, LightAction, LightSensor, LightStatus, LightStatusAction, MainTask,
            MotorOnAction, MotorStopAction, NumConst, Phrase, PhraseKind, RepeatMode, RepeatStmt,
            SerialWriteAction, ShowTextAction, StmtFlowCon, StmtList, StringConst,
            TemperatureSensor, TimerSensor, ToneAction, UltrasonicSensor, Unary, UnaryOp, Var,
            VarDeclaration, WaitTimeStmt,
        },
        visitor::PhraseVisitor,
    };
    use rustc_hash::FxHashMap;

    /// Counts calls per method and answers with the kind the method handles,
    /// without recursing.
    #[derive(Default)]
    struct Counting {
        calls: FxHashMap<PhraseKind, usize>,
    }

    impl Counting {
        fn hit(&mut self, kind: PhraseKind) -> PhraseKind {
            *self.calls.entry(kind).or_default() += 1;
            kind
        }
    }

    impl PhraseVisitor for Counting {
        type Output = PhraseKind;

        fn visit_num_const(&mut self, _: &NumConst) -> PhraseKind {
            self.hit(PhraseKind::NumConst)
        }
        fn visit_bool_const(&mut self, _: &BoolConst) -> PhraseKind {
            self.hit(PhraseKind::BoolConst)
        }
        fn visit_string_const(&mut self, _: &StringConst) -> PhraseKind {
            self.hit(PhraseKind::StringConst)
        }
        fn visit_var(&mut self, _: &Var) -> PhraseKind {
            self.hit(PhraseKind::Var)
        }
        fn visit_binary(&mut self, _: &Binary) -> PhraseKind {
            self.hit(PhraseKind::Binary)
        }
        fn visit_unary(&mut self, _: &Unary) -> PhraseKind {
            self.hit(PhraseKind::Unary)
        }
        fn visit_key_sensor(&mut self, _: &KeySensor) -> PhraseKind {
            self.hit(PhraseKind::KeySensor)
        }
        fn visit_ultrasonic_sensor(&mut self, _: &UltrasonicSensor) -> PhraseKind {
            self.hit(PhraseKind::UltrasonicSensor)
        }
        fn visit_light_sensor(&mut self, _: &LightSensor) -> PhraseKind {
            self.hit(PhraseKind::LightSensor)
        }
        fn visit_temperature_sensor(&mut self, _: &TemperatureSensor) -> PhraseKind {
            self.hit(PhraseKind::TemperatureSensor)
        }
        fn visit_timer_sensor(&mut self, _: &TimerSensor) -> PhraseKind {
            self.hit(PhraseKind::TimerSensor)
        }
        fn visit_light_action(&mut self, _: &LightAction) -> PhraseKind {
            self.hit(PhraseKind::LightAction)
        }
        fn visit_light_status_action(&mut self, _: &LightStatusAction) -> PhraseKind {
            self.hit(PhraseKind::LightStatusAction)
        }
        fn visit_tone_action(&mut self, _: &ToneAction) -> PhraseKind {
            self.hit(PhraseKind::ToneAction)
        }
        fn visit_motor_on_action(&mut self, _: &MotorOnAction) -> PhraseKind {
            self.hit(PhraseKind::MotorOnAction)
        }
        fn visit_motor_stop_action(&mut self, _: &MotorStopAction) -> PhraseKind {
            self.hit(PhraseKind::MotorStopAction)
        }
        fn visit_show_text_action(&mut self, _: &ShowTextAction) -> PhraseKind {
            self.hit(PhraseKind::ShowTextAction)
        }
        fn visit_serial_write_action(&mut self, _: &SerialWriteAction) -> PhraseKind {
            self.hit(PhraseKind::SerialWriteAction)
        }
        fn visit_stmt_list(&mut self, _: &StmtList) -> PhraseKind {
            self.hit(PhraseKind::StmtList)
        }
        fn visit_assign_stmt(&mut self, _: &AssignStmt) -> PhraseKind {
            self.hit(PhraseKind::AssignStmt)
        }
        fn visit_if_stmt(&mut self, _: &IfStmt) -> PhraseKind {
            self.hit(PhraseKind::IfStmt)
        }
        fn visit_repeat_stmt(&mut self, _: &RepeatStmt) -> PhraseKind {
            self.hit(PhraseKind::RepeatStmt)
        }
        fn visit_stmt_flow_con(&mut self, _: &StmtFlowCon) -> PhraseKind {
            self.hit(PhraseKind::StmtFlowCon)
        }
        fn visit_wait_time_stmt(&mut self, _: &WaitTimeStmt) -> PhraseKind {
            self.hit(PhraseKind::WaitTimeStmt)
        }
        fn visit_var_declaration(&mut self, _: &VarDeclaration) -> PhraseKind {
            self.hit(PhraseKind::VarDeclaration)
        }
        fn visit_main_task(&mut self, _: &MainTask) -> PhraseKind {
            self.hit(PhraseKind::MainTask)
        }
    }

    fn num(value: &str) -> Phrase {
        NumConst::make(value, None, None).unwrap().into()
    }

    fn flag() -> Phrase {
        BoolConst::make(true, None, None).into()
    }

    fn list(statements: Vec<Phrase>) -> Rc<StmtList> {
        Rc::new(StmtList::make(statements, None, None).unwrap())
    }

    /// One node of every kind.
    fn samples() -> Vec<Phrase> {
        let stop: Phrase = MotorStopAction::make("M", None, None).unwrap().into();
        let declaration =
            VarDeclaration::make("x", BlocklyType::Number, num("1"), None, None).unwrap();
        vec![
            num("1"),
            flag(),
            StringConst::make("hi", None, None).into(),
            Var::make("x", BlocklyType::Number, None, None).unwrap().into(),
            Binary::make(BinaryOp::Add, num("1"), num("2"), None, None).unwrap().into(),
            Unary::make(UnaryOp::Not, flag(), None, None).unwrap().into(),
            KeySensor::make("K", None, None).unwrap().into(),
            UltrasonicSensor::make("U", None, None).unwrap().into(),
            LightSensor::make("L", None, None).unwrap().into(),
            TemperatureSensor::make("T", None, None).unwrap().into(),
            TimerSensor::make(1, None, None).unwrap().into(),
            LightAction::make(BrickLedColor::Red, true, None, None).into(),
            LightStatusAction::make(LightStatus::Off, None, None).into(),
            ToneAction::make("B", num("440"), num("100"), None, None).unwrap().into(),
            MotorOnAction::make("M", num("50"), None, None).unwrap().into(),
            stop.clone(),
            ShowTextAction::make("D", num("1"), None, None).unwrap().into(),
            SerialWriteAction::make(num("1"), None, None).unwrap().into(),
            Phrase::StmtList(list(vec![stop.clone()])),
            AssignStmt::make("x", num("2"), None, None).unwrap().into(),
            IfStmt::make(vec![flag()], vec![list(vec![stop.clone()])], None, None, None)
                .unwrap()
                .into(),
            RepeatStmt::make(RepeatMode::Forever, None, list(vec![stop]), None, None)
                .unwrap()
                .into(),
            StmtFlowCon::make(Flow::Break, None, None).into(),
            WaitTimeStmt::make(num("10"), None, None).unwrap().into(),
            declaration.into(),
            MainTask::make(vec![], None, None).into(),
        ]
    }

    #[test]
    fn samples_cover_every_kind() {
        let kinds: Vec<PhraseKind> = samples().iter().map(Phrase::kind).collect();
        assert_eq!(kinds, PhraseKind::ALL);
    }

    #[test]
    fn accept_calls_the_matching_method_once() {
        for phrase in samples() {
            let mut visitor = Counting::default();
            let returned = phrase.accept(&mut visitor);

            assert_eq!(returned, phrase.kind());
            assert_eq!(visitor.calls.len(), 1, "{:?} made extra calls", phrase.kind());
            assert_eq!(visitor.calls[&phrase.kind()], 1);
        }
    }

    #[test]
    fn children_are_not_visited_by_dispatch() {
        let mut visitor = Counting::default();
        let nested = Binary::make(
            BinaryOp::Multiply,
            Binary::make(BinaryOp::Add, num("1"), num("2"), None, None)
                .unwrap()
                .into(),
            num("3"),
            None,
            None,
        )
        .unwrap();
        Phrase::from(nested).accept(&mut visitor);
        assert_eq!(visitor.calls.get(&PhraseKind::NumConst), None);
        assert_eq!(visitor.calls[&PhraseKind::Binary], 1);
    }
}
