use recipe_engine::model::Instructions;
use recipe_engine::sections::{
    detect, is_section_header, Detection, DetectionInput, IngredientHeaders, InstructionHeaders,
    SectionDetector, SectionStrategy,
};

#[test]
fn test_almond_shortbread_and_cherry_filling() {
    let sections = detect(
        &[
            "Almond Shortbread Ingredients:",
            "1 cup flour",
            "Cherry Filling:",
            "2 cups cherries",
        ],
        "Make the almond shortbread: cream butter and flour, press into a pan. \
         Make the cherry filling: simmer cherries until thick, spread over the base.",
    )
    .expect("two sections");

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].id, "section-1");
    assert_eq!(sections[0].label, "Almond Shortbread");
    assert_eq!(sections[0].ingredients, vec!["1 cup flour"]);
    assert!(sections[0]
        .instructions
        .starts_with("Make the almond shortbread:"));
    assert!(!sections[0].instructions.contains("cherries"));

    assert_eq!(sections[1].id, "section-2");
    assert_eq!(sections[1].label, "Cherry Filling");
    assert_eq!(sections[1].ingredients, vec!["2 cups cherries"]);
    assert!(sections[1].instructions.starts_with("Make the cherry filling:"));
}

#[test]
fn test_single_recipe_is_not_sectioned() {
    assert_eq!(detect(&["1 cup flour"], "Mix and bake."), None);
    let empty: [&str; 0] = [];
    assert_eq!(detect(&empty, "Mix and bake."), None);
}

#[test]
fn test_blank_ingredient_lines_are_ignored() {
    let sections = detect(
        &["For the crust:", "  ", "1 cup flour", "", "For the topping:", "1 cup oats", " "],
        "Make the crust by pressing flour into a tin. Make the topping by toasting oats.",
    )
    .expect("two sections");

    assert_eq!(sections[0].ingredients, vec!["1 cup flour"]);
    assert_eq!(sections[1].ingredients, vec!["1 cup oats"]);
}

#[test]
fn test_labels_are_title_cased() {
    let sections = detect(
        &["for the LEMON glaze:", "1 cup sugar", "for the crumb topping:", "1 cup oats"],
        "Whisk the glaze. Scatter the topping.",
    )
    .expect("two sections");
    assert_eq!(sections[0].label, "Lemon Glaze");
    assert_eq!(sections[1].label, "Crumb Topping");
}

#[test]
fn test_instruction_headers_fallback() {
    let sections = detect(
        &[
            "1 1/2 cups graham cracker crumbs",
            "6 tbsp melted butter",
            "16 oz cream cheese",
            "1/2 cup sugar",
        ],
        Instructions::Steps(vec![
            "For the crust: stir the crumbs into the butter and press into a pan.".to_string(),
            "For the filling: beat cream cheese with sugar until smooth.".to_string(),
        ]),
    )
    .expect("two sections");

    assert_eq!(sections.len(), 2);
    assert_eq!(sections[0].label, "Crust");
    assert_eq!(
        sections[0].ingredients,
        vec!["1 1/2 cups graham cracker crumbs", "6 tbsp melted butter"]
    );
    assert_eq!(sections[1].label, "Filling");
    assert_eq!(
        sections[1].ingredients,
        vec!["16 oz cream cheese", "1/2 cup sugar"]
    );
}

#[test]
fn test_detector_reports_winning_strategy() {
    let detection = SectionDetector::default().run(
        &["1 cup flour", "1 cup sugar", "2 apples"],
        Instructions::from("For the base: mix flour. For the topping: slice apples with sugar."),
    );

    match detection {
        Detection::Sections { strategy, sections } => {
            assert_eq!(strategy, "instruction_headers");
            assert_eq!(sections.len(), 2);
        }
        Detection::NoSections => panic!("expected sections"),
    }
}

#[test]
fn test_strategies_can_be_run_on_their_own() {
    let input = DetectionInput::new(
        &["Crust:", "1 cup flour", "Filling:", "2 apples"],
        Instructions::from("Press the crust. Cook the filling."),
    );

    assert_eq!(IngredientHeaders.name(), "ingredient_headers");
    assert_eq!(IngredientHeaders.detect(&input).map(|s| s.len()), Some(2));
    assert_eq!(InstructionHeaders.detect(&input), None);
}

#[test]
fn test_section_header_recognition() {
    assert!(is_section_header("Streusel Topping"));
    assert!(is_section_header("For the sauce:"));
    assert!(is_section_header("Cake Ingredients:"));
    assert!(!is_section_header("1 cup pizza sauce"));
    assert!(!is_section_header("sauce"));
}
