mod selection_props;
